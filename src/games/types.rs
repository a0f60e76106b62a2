use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    CoinFlip,
    Dice,
    Limbo,
    Crash,
    Slots,
    Mines,
    Blackjack,
}

impl GameType {
    pub fn all() -> [GameType; 7] {
        [
            GameType::CoinFlip,
            GameType::Dice,
            GameType::Limbo,
            GameType::Crash,
            GameType::Slots,
            GameType::Mines,
            GameType::Blackjack,
        ]
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::CoinFlip => write!(f, "coinflip"),
            GameType::Dice => write!(f, "dice"),
            GameType::Limbo => write!(f, "limbo"),
            GameType::Crash => write!(f, "crash"),
            GameType::Slots => write!(f, "slots"),
            GameType::Mines => write!(f, "mines"),
            GameType::Blackjack => write!(f, "blackjack"),
        }
    }
}

/// Coin flip choice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoinChoice {
    Heads,
    Tails,
}

impl fmt::Display for CoinChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinChoice::Heads => write!(f, "heads"),
            CoinChoice::Tails => write!(f, "tails"),
        }
    }
}

/// Dice bet direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiceMode {
    /// Wins when the sum is strictly greater than the target
    Over,
    /// Wins when the sum is less than or equal to the target
    Under,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// Everything a player needs to recompute a draw offline.
///
/// `server_seed` is absent until the round is revealed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub round_id: String,
    pub server_seed_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
    pub client_seed: String,
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoinFlipOutcome {
    pub outcome: CoinChoice,
    pub won: bool,
    pub multiplier: f64,
    pub payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiceOutcome {
    pub roll: u8,
    pub d1: u8,
    pub d2: u8,
    pub won: bool,
    pub multiplier: f64,
    pub payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LimboOutcome {
    pub result: f64,
    pub won: bool,
    pub multiplier: f64,
    pub payout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrashOutcome {
    pub crash_point: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotsOutcome {
    pub reels: [String; 3],
    pub won: bool,
    pub multiplier: f64,
    pub payout: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MinesOutcome {
    pub mines: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlackjackDeal {
    pub deck: Vec<Card>,
}

/// A resolved outcome together with the proof it was derived from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settled<T> {
    #[serde(flatten)]
    pub outcome: T,
    pub proof: Proof,
}

/// Round to 8 decimal places for currency-agnostic amounts
pub fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

/// Payout for a realised multiplier (0 on a loss)
pub fn payout_for(bet_amount: f64, multiplier: f64) -> f64 {
    round8(bet_amount * multiplier)
}
