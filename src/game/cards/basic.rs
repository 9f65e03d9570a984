use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::hand::HandError;

/// Suits in canonical deck order. The discriminant is the tie-break weight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum Suit {
    Spades = 4,
    Hearts = 3,
    Clubs = 2,
    Diamonds = 1,
}

impl Suit {
    pub fn weight(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Suit::Spades => "黑桃",
            Suit::Hearts => "红桃",
            Suit::Clubs => "梅花",
            Suit::Diamonds => "方块",
        }
    }
}

impl PartialOrd for Suit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Suit {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Suit::iter()
            .find(|suit| suit.label() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, EnumIter,
)]
pub enum Rank {
    Ace = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
}

impl Rank {
    /// Ace=1, numerals their number, Jack/Queen/King 11/12/13.
    pub fn face_value(self) -> u8 {
        self as u8
    }

    /// Jack, Queen and King are flower cards.
    pub fn is_flower(self) -> bool {
        self.face_value() > 10
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Rank {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Rank::iter()
            .find(|rank| rank.label() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.face_value().cmp(&other.face_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Joker {
    Big,
    Small,
}

impl Joker {
    pub fn label(self) -> &'static str {
        match self {
            Joker::Big => "大王",
            Joker::Small => "小王",
        }
    }
}

/// A card of the 54-card universe. Jokers carry no rank and never reach a dealt hand.
/// Serialises as its wire label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Card {
    Suited { suit: Suit, rank: Rank },
    Joker(Joker),
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Card::Suited { suit, rank }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            Card::Suited { suit, .. } => Some(*suit),
            Card::Joker(_) => None,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Card::Suited { rank, .. } => Some(*rank),
            Card::Joker(_) => None,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker(_))
    }

    /// `suit_weight * 10 + face_value`, used only to break equal point values.
    pub fn weight(&self) -> u8 {
        match self {
            Card::Suited { suit, rank } => suit.weight() * 10 + rank.face_value(),
            Card::Joker(_) => 0,
        }
    }

    /// Parses the wire label: a two-glyph suit label followed by the rank label.
    pub fn from_label(s: &str) -> Result<Self, HandError> {
        if let Some(joker) = [Joker::Big, Joker::Small]
            .into_iter()
            .find(|joker| joker.label() == s)
        {
            return Ok(Card::Joker(joker));
        }

        let split = s
            .char_indices()
            .nth(2)
            .map(|(idx, _)| idx)
            .ok_or_else(|| HandError::InvalidCard(s.to_string()))?;
        let (suit, rank) = s.split_at(split);

        let suit = Suit::try_from(suit).map_err(|_| HandError::InvalidCard(s.to_string()))?;
        let rank = Rank::try_from(rank).map_err(|_| HandError::InvalidCard(s.to_string()))?;

        Ok(Self::new(rank, suit))
    }

    /// Every card in canonical order: Spades, Hearts, Clubs, Diamonds, each A..K,
    /// then the big and small jokers unless excluded.
    pub fn all_cards(exclude_jokers: bool) -> Vec<Card> {
        let mut cards = Vec::with_capacity(54);
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card::new(rank, suit));
            }
        }
        if !exclude_jokers {
            cards.push(Card::Joker(Joker::Big));
            cards.push(Card::Joker(Joker::Small));
        }
        cards
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited { suit, rank } => write!(f, "{}{}", suit, rank),
            Card::Joker(joker) => f.write_str(joker.label()),
        }
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = HandError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Card::from_label(&label)
    }
}
