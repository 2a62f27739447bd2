//! # Card Book
//!
//! Cards keyed by their metadata-store key. Every reconciliation pass takes
//! a generation number; a pass only publishes if no newer pass has, and a
//! decryption result only lands on a card published by the same pass.

use std::collections::HashMap;

use super::entities::{Card, StatsState};

/// Cached card list.
#[derive(Debug, Default)]
pub struct CardBook {
    cards: HashMap<String, Card>,
    next_generation: u64,
    published_generation: u64,
}

impl CardBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a generation for a new pass.
    pub fn begin_pass(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Generation of the list currently shown.
    pub fn published_generation(&self) -> u64 {
        self.published_generation
    }

    /// Replace the list with a pass's cards. Cards with an on-chain id enter
    /// `StatsPending`, the rest `Listed`. Returns `false` and changes nothing
    /// when a newer pass already published.
    pub fn publish(&mut self, generation: u64, cards: Vec<Card>) -> bool {
        self.replace(generation, cards, true)
    }

    /// Like [`CardBook::publish`], but every card stays `Listed`. Used when
    /// nothing can read the encrypted aggregates.
    pub fn publish_listed(&mut self, generation: u64, cards: Vec<Card>) -> bool {
        self.replace(generation, cards, false)
    }

    fn replace(&mut self, generation: u64, cards: Vec<Card>, decrypt: bool) -> bool {
        if generation < self.published_generation {
            return false;
        }
        self.cards = cards
            .into_iter()
            .map(|mut card| {
                card.generation = generation;
                card.stats = if decrypt && card.id.is_some() {
                    StatsState::StatsPending
                } else {
                    StatsState::Listed
                };
                (card.doc_id.clone(), card)
            })
            .collect();
        self.published_generation = generation;
        true
    }

    /// Write a decryption outcome. Ignored unless the card still belongs to
    /// `generation` and the transition is legal.
    pub fn apply_stats(&mut self, doc_id: &str, generation: u64, next: StatsState) -> bool {
        match self.cards.get_mut(doc_id) {
            Some(card) if card.generation == generation && card.stats.can_transition_to(&next) => {
                card.stats = next;
                true
            }
            _ => false,
        }
    }

    /// One card.
    pub fn get(&self, doc_id: &str) -> Option<&Card> {
        self.cards.get(doc_id)
    }

    /// Visible cards, newest first, ties broken by key.
    pub fn visible(&self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.cards.values().cloned().collect();
        cards.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        cards
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DegradedReason;
    use pr_03_encryption_gateway::DecryptedStats;
    use shared_types::OnChainCardId;

    fn card(doc_id: &str, created_at: u64, id: Option<u64>) -> Card {
        Card {
            doc_id: doc_id.to_string(),
            id: id.map(OnChainCardId),
            title: doc_id.to_uppercase(),
            description: None,
            creator: None,
            created_at,
            total_reviews: 0,
            stats: StatsState::Unloaded,
            generation: 0,
        }
    }

    #[test]
    fn test_publish_sets_initial_states() {
        let mut book = CardBook::new();
        let gen = book.begin_pass();
        assert!(book.publish(gen, vec![card("a", 1, Some(1)), card("b", 2, None)]));
        assert_eq!(book.get("a").unwrap().stats, StatsState::StatsPending);
        assert_eq!(book.get("b").unwrap().stats, StatsState::Listed);
        assert_eq!(book.get("a").unwrap().generation, gen);
    }

    #[test]
    fn test_publish_listed_holds_confirmed_cards() {
        let mut book = CardBook::new();
        let gen = book.begin_pass();
        assert!(book.publish_listed(gen, vec![card("a", 1, Some(1))]));
        assert_eq!(book.get("a").unwrap().stats, StatsState::Listed);
        assert!(!book.get("a").unwrap().is_decrypting());
        assert!(!book.apply_stats(
            "a",
            gen,
            StatsState::StatsDegraded(DegradedReason::Failed)
        ));
    }

    #[test]
    fn test_visible_order() {
        let mut book = CardBook::new();
        let gen = book.begin_pass();
        book.publish(
            gen,
            vec![card("b", 5, None), card("a", 5, None), card("c", 9, None)],
        );
        let order: Vec<String> = book.visible().into_iter().map(|c| c.doc_id).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_stale_pass_cannot_publish() {
        let mut book = CardBook::new();
        let old = book.begin_pass();
        let new = book.begin_pass();
        assert!(book.publish(new, vec![card("a", 1, None)]));
        assert!(!book.publish(old, vec![]));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut book = CardBook::new();
        let first = book.begin_pass();
        book.publish(first, vec![card("a", 1, Some(1))]);
        let second = book.begin_pass();
        book.publish(second, vec![card("a", 1, Some(1))]);

        let ready = StatsState::StatsReady(DecryptedStats::from_totals(8, 2));
        assert!(!book.apply_stats("a", first, ready));
        assert_eq!(book.get("a").unwrap().stats, StatsState::StatsPending);

        assert!(book.apply_stats("a", second, ready));
        assert_eq!(book.get("a").unwrap().average_rating(), 4.0);
    }

    #[test]
    fn test_result_for_unknown_or_listed_card_is_dropped() {
        let mut book = CardBook::new();
        let gen = book.begin_pass();
        book.publish(gen, vec![card("pending", 1, None)]);
        let degraded = StatsState::StatsDegraded(DegradedReason::Failed);
        assert!(!book.apply_stats("missing", gen, degraded));
        assert!(!book.apply_stats("pending", gen, degraded));
    }

    #[test]
    fn test_results_apply_once() {
        let mut book = CardBook::new();
        let gen = book.begin_pass();
        book.publish(gen, vec![card("a", 1, Some(1))]);
        assert!(book.apply_stats("a", gen, StatsState::StatsDegraded(DegradedReason::Failed)));
        assert!(!book.apply_stats(
            "a",
            gen,
            StatsState::StatsReady(DecryptedStats::zero())
        ));
    }
}
