//! Blackjack deal
//!
//! Only the shuffle belongs to the provably-fair contract. Hand evaluation and
//! dealer play consume the returned deck as a stack (pop from the end).

use crate::games::rng::{fisher_yates, SeededSequence};
use crate::games::types::{BlackjackDeal, Card, Rank, Suit};

/// Ordered 52-card deck: suits outer, ranks inner
pub fn ordered_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card { rank, suit }))
        .collect()
}

pub fn deal<S: SeededSequence + ?Sized>(rng: &mut S) -> BlackjackDeal {
    let mut deck = ordered_deck();
    fisher_yates(&mut deck, rng);
    BlackjackDeal { deck }
}
