use async_trait::async_trait;

/// Supplies display names for clients that connect without one
#[async_trait]
pub trait NameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based guest name generator
pub struct PetNameGenerator;

impl PetNameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameGenerator for PetNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}
