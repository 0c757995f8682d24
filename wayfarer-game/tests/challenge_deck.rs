use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use wayfarer_game::{
    CardIcon, CardId, ChallengeDeck, DeckPhase, DeckStateError, TransitionError, content,
};

fn deck_with_head(head: CardId) -> ChallengeDeck {
    let mut stack = vec![head];
    stack.extend((1..=24).filter(|&id| id != head));
    ChallengeDeck::from_stack(stack).expect("full stack")
}

/// Cards handed out by `draw` and `discard_scouted` since the last reshuffle.
#[derive(Default)]
struct Ledger {
    drawn: Vec<CardId>,
    discarded: Vec<CardId>,
}

impl Ledger {
    fn clear(&mut self) {
        self.drawn.clear();
        self.discarded.clear();
    }

    /// Stack, drawn and discarded are disjoint and together are the catalog.
    fn assert_conserved(&self, deck: &ChallengeDeck) {
        let mut ids: Vec<CardId> = deck.stack().to_vec();
        ids.extend(&self.drawn);
        ids.extend(&self.discarded);
        let unique: BTreeSet<CardId> = ids.iter().copied().collect();
        assert_eq!(
            unique.len(),
            ids.len(),
            "card held twice: stack {:?}, drawn {:?}, discarded {:?}",
            deck.stack(),
            self.drawn,
            self.discarded
        );
        assert_eq!(unique.into_iter().collect::<Vec<_>>(), (1..=24).collect::<Vec<_>>());
        assert!(deck.scout_position() <= deck.size());
    }
}

#[test]
fn catalog_values_match_printed_cards() {
    let catalog = content().challenge();
    let first = catalog.get(1).unwrap();
    assert_eq!((first.awa, first.spi, first.fit, first.foc), (0, 0, -1, 1));
    assert_eq!(first.icon, CardIcon::Sun);
    assert!(!first.reshuffle);

    let eighth = catalog.get(8).unwrap();
    assert!(eighth.reshuffle);
    let flagged: Vec<CardId> = catalog
        .cards()
        .iter()
        .filter(|card| card.reshuffle)
        .map(|card| card.id)
        .collect();
    assert_eq!(flagged, vec![8, 16, 24]);
    assert!(catalog.get(0).is_none());
    assert!(catalog.get(25).is_none());
}

#[test]
fn drawing_a_plain_card_removes_it() {
    let mut deck = deck_with_head(1);
    let mut rng = SmallRng::seed_from_u64(1);
    let outcome = deck
        .draw(content().challenge(), &mut rng)
        .unwrap()
        .expect("card drawn");
    assert_eq!(outcome.card, 1);
    assert!(!outcome.reshuffled);
    assert_eq!(deck.size(), 23);
    assert!(!deck.stack().contains(&1));
    assert_eq!(deck.missing(), vec![1]);
    assert_eq!(deck.scout_position(), 0);
}

#[test]
fn drawing_a_flagged_card_restores_the_full_deck() {
    let mut deck = deck_with_head(8);
    let mut rng = SmallRng::seed_from_u64(2);
    let outcome = deck
        .draw(content().challenge(), &mut rng)
        .unwrap()
        .expect("card drawn");
    assert_eq!(outcome.card, 8);
    assert!(outcome.reshuffled);
    assert_eq!(deck.size(), 24);
    assert_eq!(deck.scout_position(), 0);
    assert!(deck.missing().is_empty());
}

#[test]
fn discarding_a_scouted_reshuffle_card_does_not_reshuffle() {
    let mut deck = deck_with_head(8);
    assert_eq!(deck.scout(), Ok(Some(8)));
    assert_eq!(deck.discard_scouted(), Ok(vec![8]));
    assert_eq!(deck.size(), 23);
    assert_eq!(deck.missing(), vec![8]);
    assert_eq!(deck.phase(), DeckPhase::Idle);
    assert_eq!(deck.stack().first(), Some(&1));
}

#[test]
fn scouting_twice_then_discarding_drops_both_cards() {
    let mut deck = ChallengeDeck::with_seed(0x5EED);
    let before = deck.stack().to_vec();
    let first = deck.scout().unwrap().unwrap();
    let second = deck.scout().unwrap().unwrap();
    assert_eq!(deck.stack(), before.as_slice(), "scouting must not reorder");
    assert_eq!(deck.phase(), DeckPhase::Scouted(2));
    assert_eq!(deck.scouted(), &[first, second]);

    let discarded = deck.discard_scouted().unwrap();
    assert_eq!(discarded, vec![first, second]);
    assert_eq!(deck.size(), 22);
    assert!(!deck.stack().contains(&first));
    assert!(!deck.stack().contains(&second));
    assert_eq!(deck.phase(), DeckPhase::Idle);
}

#[test]
fn returning_scouted_cards_keeps_their_order() {
    let mut deck = ChallengeDeck::with_seed(7);
    let before = deck.clone();
    deck.scout().unwrap();
    deck.scout().unwrap();
    deck.return_scouted().unwrap();
    assert_eq!(deck, before);
    assert_eq!(deck.return_scouted(), Err(TransitionError::NothingScouted));
}

#[test]
fn draw_is_refused_while_cards_are_scouted() {
    let mut deck = ChallengeDeck::with_seed(9);
    let mut rng = SmallRng::seed_from_u64(9);
    deck.scout().unwrap();
    let before = deck.clone();
    assert_eq!(
        deck.draw(content().challenge(), &mut rng),
        Err(TransitionError::DrawWhileScouted { scouted: 1 })
    );
    assert_eq!(deck, before);
}

#[test]
fn scouting_stops_at_the_bottom() {
    let mut deck = ChallengeDeck::from_stack(vec![3, 4]).unwrap();
    assert_eq!(deck.scout(), Ok(Some(3)));
    assert_eq!(deck.scout(), Ok(Some(4)));
    assert_eq!(deck.scout(), Err(TransitionError::ScoutExhausted));
    assert!(!deck.can_scout());
    deck.discard_scouted().unwrap();
    assert!(deck.is_empty());
    assert_eq!(deck.scout(), Ok(None));
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(deck.draw(content().challenge(), &mut rng), Ok(None));
}

#[test]
fn seeded_decks_are_reproducible() {
    assert_eq!(ChallengeDeck::with_seed(42), ChallengeDeck::with_seed(42));
    let ids: BTreeSet<CardId> = ChallengeDeck::with_seed(42).stack().iter().copied().collect();
    assert_eq!(ids.len(), 24);
}

#[test]
fn random_operation_sequences_conserve_cards() {
    let catalog = content().challenge();
    for seed in 0..32_u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut deck = ChallengeDeck::shuffled(&mut rng);
        let mut ledger = Ledger::default();
        for _ in 0..200 {
            match rng.gen_range(0..5) {
                0 => {
                    let before = deck.stack().to_vec();
                    let _ = deck.scout();
                    assert_eq!(deck.stack(), before.as_slice());
                }
                1 => match deck.draw(catalog, &mut rng) {
                    Ok(Some(outcome)) if outcome.reshuffled => ledger.clear(),
                    Ok(Some(outcome)) => ledger.drawn.push(outcome.card),
                    Ok(None) | Err(_) => {}
                },
                2 => {
                    if let Ok(dropped) = deck.discard_scouted() {
                        ledger.discarded.extend(dropped);
                    }
                }
                3 => {
                    let _ = deck.return_scouted();
                }
                _ => {
                    if deck.can_draw() && rng.gen_bool(0.1) {
                        deck.reshuffle(&mut rng);
                        ledger.clear();
                    }
                }
            }
            ledger.assert_conserved(&deck);
        }
    }
}

#[test]
fn persisted_shape_is_stack_and_cursor() {
    let mut deck = ChallengeDeck::from_stack(vec![5, 6, 7]).unwrap();
    deck.scout().unwrap();
    let json = serde_json::to_value(&deck).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "stack": [5, 6, 7], "scoutPosition": 1 })
    );
    let back: ChallengeDeck = serde_json::from_value(json).unwrap();
    assert_eq!(back, deck);
}

#[test]
fn invalid_records_are_rejected() {
    assert_eq!(
        ChallengeDeck::from_stack(vec![1, 1]),
        Err(DeckStateError::DuplicateCard { id: 1 })
    );
    assert_eq!(
        ChallengeDeck::from_stack(vec![25]),
        Err(DeckStateError::UnknownCard { id: 25 })
    );
    let past_end = serde_json::json!({ "stack": [1], "scoutPosition": 2 });
    assert!(serde_json::from_value::<ChallengeDeck>(past_end).is_err());
}
