//! Challenge deck: a persisted, scoutable stack of modifier cards.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::CHALLENGE_CARD_COUNT;
use crate::error::{ContentError, DeckStateError, TransitionError};
use crate::seed::stream_rng;

/// Stable catalog id, `1..=24`.
pub type CardId = u8;

/// Symbolic effect class printed on a challenge card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardIcon {
    Sun,
    Mountain,
    Crest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeCard {
    pub id: CardId,
    pub awa: i8,
    pub spi: i8,
    pub fit: i8,
    pub foc: i8,
    pub icon: CardIcon,
    #[serde(default)]
    pub reshuffle: bool,
}

/// The fixed card catalog, indexed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeCatalog {
    cards: Vec<ChallengeCard>,
}

impl ChallengeCatalog {
    /// Validate the shipped card list: exactly one card for every id `1..=24`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Catalog`] if an id is missing, repeated or out of range.
    pub fn from_cards(mut cards: Vec<ChallengeCard>) -> Result<Self, ContentError> {
        cards.sort_by_key(|card| card.id);
        if cards.len() != usize::from(CHALLENGE_CARD_COUNT) {
            return Err(ContentError::Catalog {
                reason: format!(
                    "expected {CHALLENGE_CARD_COUNT} cards, found {}",
                    cards.len()
                ),
            });
        }
        for (expected, card) in (1..=CHALLENGE_CARD_COUNT).zip(&cards) {
            if card.id != expected {
                return Err(ContentError::Catalog {
                    reason: format!("card id {expected} missing (found {})", card.id),
                });
            }
        }
        Ok(Self { cards })
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&ChallengeCard> {
        usize::from(id)
            .checked_sub(1)
            .and_then(|idx| self.cards.get(idx))
    }

    #[must_use]
    pub fn cards(&self) -> &[ChallengeCard] {
        &self.cards
    }

    fn triggers_reshuffle(&self, id: CardId) -> bool {
        self.get(id).is_some_and(|card| card.reshuffle)
    }
}

/// Whether any cards are currently peeked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeckPhase {
    Idle,
    Scouted(usize),
}

/// Result of a committed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawOutcome {
    pub card: CardId,
    /// The drawn card carried the reshuffle flag and the deck was reset.
    pub reshuffled: bool,
}

/// Persisted shape of the deck, validated into a [`ChallengeDeck`] on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDeckRecord {
    pub stack: Vec<CardId>,
    #[serde(default)]
    pub scout_position: usize,
}

/// Undrawn challenge cards plus the scout cursor.
///
/// The top `scout_position` cards of `stack` have been revealed but not
/// committed. `scout_position <= stack.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChallengeDeckRecord", into = "ChallengeDeckRecord")]
pub struct ChallengeDeck {
    stack: Vec<CardId>,
    scout_position: usize,
}

impl TryFrom<ChallengeDeckRecord> for ChallengeDeck {
    type Error = DeckStateError;

    fn try_from(record: ChallengeDeckRecord) -> Result<Self, Self::Error> {
        let deck = Self::from_stack(record.stack)?;
        if record.scout_position > deck.stack.len() {
            return Err(DeckStateError::ScoutPastEnd {
                position: record.scout_position,
                size: deck.stack.len(),
            });
        }
        Ok(Self {
            scout_position: record.scout_position,
            ..deck
        })
    }
}

impl From<ChallengeDeck> for ChallengeDeckRecord {
    fn from(deck: ChallengeDeck) -> Self {
        Self {
            stack: deck.stack,
            scout_position: deck.scout_position,
        }
    }
}

fn full_stack() -> Vec<CardId> {
    (1..=CHALLENGE_CARD_COUNT).collect()
}

impl ChallengeDeck {
    /// A full deck in random order with nothing scouted.
    pub fn shuffled<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut stack = full_stack();
        stack.shuffle(rng);
        Self {
            stack,
            scout_position: 0,
        }
    }

    /// A full deck shuffled from the campaign seed's challenge stream.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::shuffled(&mut stream_rng(seed, b"challenge"))
    }

    /// Restore a deck in a known order with nothing scouted.
    ///
    /// # Errors
    ///
    /// Returns a [`DeckStateError`] if an id is outside the catalog or repeated.
    pub fn from_stack(stack: Vec<CardId>) -> Result<Self, DeckStateError> {
        let mut seen = BTreeSet::new();
        for &id in &stack {
            if id == 0 || id > CHALLENGE_CARD_COUNT {
                return Err(DeckStateError::UnknownCard { id });
            }
            if !seen.insert(id) {
                return Err(DeckStateError::DuplicateCard { id });
            }
        }
        Ok(Self {
            stack,
            scout_position: 0,
        })
    }

    #[must_use]
    pub fn stack(&self) -> &[CardId] {
        &self.stack
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub const fn scout_position(&self) -> usize {
        self.scout_position
    }

    #[must_use]
    pub const fn phase(&self) -> DeckPhase {
        if self.scout_position == 0 {
            DeckPhase::Idle
        } else {
            DeckPhase::Scouted(self.scout_position)
        }
    }

    /// Cards revealed by scouting, top first.
    #[must_use]
    pub fn scouted(&self) -> &[CardId] {
        &self.stack[..self.scout_position]
    }

    /// Catalog ids no longer in the stack (drawn or discarded since the last reshuffle).
    #[must_use]
    pub fn missing(&self) -> Vec<CardId> {
        (1..=CHALLENGE_CARD_COUNT)
            .filter(|id| !self.stack.contains(id))
            .collect()
    }

    #[must_use]
    pub fn can_scout(&self) -> bool {
        self.scout_position < self.stack.len()
    }

    #[must_use]
    pub const fn can_draw(&self) -> bool {
        self.scout_position == 0
    }

    /// Reveal the next unscouted card without removing it.
    ///
    /// Returns `Ok(None)` when the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::ScoutExhausted`] if every remaining card has
    /// already been scouted.
    pub fn scout(&mut self) -> Result<Option<CardId>, TransitionError> {
        if self.stack.is_empty() {
            return Ok(None);
        }
        let Some(&card) = self.stack.get(self.scout_position) else {
            return Err(TransitionError::ScoutExhausted);
        };
        self.scout_position += 1;
        log::debug!("scouted challenge card {card} (position {})", self.scout_position);
        Ok(Some(card))
    }

    /// Commit the top card. A card flagged for reshuffle resets the deck to a
    /// fresh full stack before returning.
    ///
    /// Returns `Ok(None)` when the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::DrawWhileScouted`] while scouted cards are
    /// unresolved.
    pub fn draw<R>(
        &mut self,
        catalog: &ChallengeCatalog,
        rng: &mut R,
    ) -> Result<Option<DrawOutcome>, TransitionError>
    where
        R: Rng + ?Sized,
    {
        if self.scout_position > 0 {
            return Err(TransitionError::DrawWhileScouted {
                scouted: self.scout_position,
            });
        }
        if self.stack.is_empty() {
            return Ok(None);
        }
        let card = self.stack.remove(0);
        let reshuffled = catalog.triggers_reshuffle(card);
        if reshuffled {
            log::info!("challenge card {card} triggered a reshuffle");
            self.reshuffle(rng);
        } else {
            log::debug!("drew challenge card {card}, {} remaining", self.stack.len());
        }
        Ok(Some(DrawOutcome { card, reshuffled }))
    }

    /// Remove every scouted card from the stack without drawing it.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NothingScouted`] if no card is scouted.
    pub fn discard_scouted(&mut self) -> Result<Vec<CardId>, TransitionError> {
        if self.scout_position == 0 {
            return Err(TransitionError::NothingScouted);
        }
        let discarded: Vec<CardId> = self.stack.drain(..self.scout_position).collect();
        self.scout_position = 0;
        log::debug!("discarded scouted challenge cards {discarded:?}");
        Ok(discarded)
    }

    /// Leave the scouted cards on top of the stack, in order, and clear the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NothingScouted`] if no card is scouted.
    pub fn return_scouted(&mut self) -> Result<(), TransitionError> {
        if self.scout_position == 0 {
            return Err(TransitionError::NothingScouted);
        }
        log::debug!("returned {} scouted challenge card(s)", self.scout_position);
        self.scout_position = 0;
        Ok(())
    }

    /// Reset to a full, freshly shuffled stack.
    pub fn reshuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        *self = Self::shuffled(rng);
    }
}
