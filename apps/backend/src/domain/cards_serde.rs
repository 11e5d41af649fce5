//! Serialization and deserialization for card types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_parsing::rank_char;
use super::cards_types::{Card, Rank, Suit, Trump};

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Spades => "SPADES",
            Suit::Hearts => "HEARTS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Clubs => "CLUBS",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "SPADES" => Ok(Suit::Spades),
            "HEARTS" => Ok(Suit::Hearts),
            "DIAMONDS" => Ok(Suit::Diamonds),
            "CLUBS" => Ok(Suit::Clubs),
            _ => Err(serde::de::Error::custom(format!("Invalid suit: {s}"))),
        }
    }
}

// Rank serde uses the rank letter of the compact card form ("T" for ten)
impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buf = [0u8; 4];
        serializer.serialize_str(rank_char(*self).encode_utf8(&mut buf))
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "T" | "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(serde::de::Error::custom(format!("Invalid rank: {s}"))),
        }
    }
}

impl Serialize for Trump {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Trump::Suit(s) => s.serialize(serializer),
            Trump::AllTrumps => serializer.serialize_str("ALL_TRUMPS"),
            Trump::NoTrumps => serializer.serialize_str("NO_TRUMPS"),
        }
    }
}

impl<'de> Deserialize<'de> for Trump {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "SPADES" => Ok(Trump::Suit(Suit::Spades)),
            "HEARTS" => Ok(Trump::Suit(Suit::Hearts)),
            "DIAMONDS" => Ok(Trump::Suit(Suit::Diamonds)),
            "CLUBS" => Ok(Trump::Suit(Suit::Clubs)),
            "ALL_TRUMPS" => Ok(Trump::AllTrumps),
            "NO_TRUMPS" => Ok(Trump::NoTrumps),
            _ => Err(serde::de::Error::custom(format!("Invalid trump: {s}"))),
        }
    }
}

// Card serde (compact form like "JS", "TH")
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Card>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
