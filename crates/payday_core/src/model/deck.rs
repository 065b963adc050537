//! The set of cards active in the current round

use serde::{Deserialize, Serialize};

use super::card::{Card, CardKind, DEBT_CARD_TTL, TrackKey};
use super::ids::CardId;
use super::ledger::{Dollars, SavingsBucket};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: Card) -> CardId {
        let id = card.id;
        self.cards.push(card);
        id
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn has_active(&self, title: &str) -> bool {
        self.cards.iter().any(|c| c.title == title)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.title == title)
    }

    pub fn tracked(&self, key: TrackKey) -> Option<&Card> {
        self.cards.iter().find(|c| c.meta.track == Some(key))
    }

    pub fn of_kind(&self, kind: CardKind) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.kind == kind)
    }

    pub fn goal_for(&self, bucket: SavingsBucket) -> Option<&Card> {
        self.cards
            .iter()
            .find(|c| c.meta.savings_type == Some(bucket))
    }

    // === Debt card ===

    pub fn debt_card(&self) -> Option<&Card> {
        self.cards.iter().find(|c| c.is_debt_card())
    }

    /// Keep the debt card target at `debt + already paid on it`.
    pub fn sync_debt_card(&mut self, debt: Dollars) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.is_debt_card()) {
            card.amount = debt + card.paid();
            card.rounds_left = DEBT_CARD_TTL;
        }
    }

    pub fn remove_debt_card(&mut self) {
        self.cards.retain(|c| !c.is_debt_card());
    }

    // === Lifecycle ===

    /// Tick every TTL down by one and drop expired cards. The debt card is exempt.
    pub fn age(&mut self) {
        for card in self.cards.iter_mut().filter(|c| !c.is_debt_card()) {
            card.rounds_left = card.rounds_left.max(1) - 1;
        }
        self.cards.retain(|c| c.is_debt_card() || c.rounds_left > 0);
    }

    /// Empty the payment stacks of goal cards for one bucket.
    pub fn clear_goal_payments(&mut self, bucket: SavingsBucket) {
        for card in self
            .cards
            .iter_mut()
            .filter(|c| c.meta.savings_type == Some(bucket))
        {
            card.payments.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::card::CardMeta;

    #[test]
    fn test_age_drops_expired_but_keeps_debt_card() {
        let mut deck = Deck::default();
        deck.push(Card::new(CardId(1), CardKind::Fixed, "Rent", 1600).ttl(2));
        deck.push(Card::new(CardId(2), CardKind::Variable, "Groceries", 200));
        deck.push(
            Card::new(CardId(3), CardKind::Fixed, "Debt Balance", 500)
                .ttl(DEBT_CARD_TTL)
                .meta(CardMeta {
                    debt_card: true,
                    ..Default::default()
                }),
        );

        deck.age();

        assert_eq!(deck.len(), 2);
        assert_eq!(deck.get(CardId(1)).unwrap().rounds_left, 1);
        assert!(deck.get(CardId(2)).is_none());
        assert_eq!(deck.debt_card().unwrap().rounds_left, DEBT_CARD_TTL);
    }
}
