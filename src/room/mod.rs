// Public API
pub use models::{ConnectionId, Participant};
pub use names::{NameGenerator, PetNameGenerator};
pub use registry::{InMemoryRoomRegistry, RegisterResult, RoomRegistry};
pub use service::RoomService;

pub mod models;
mod names;
pub mod registry;
pub mod service;
