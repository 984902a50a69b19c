use super::party::Party;
use super::random::RandomSource;
use super::{GameState, Timestamp};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of liberal policies in the game.
pub const LIBERAL_POLICIES: usize = 6;
/// Number of fascist policies in the game.
pub const FASCIST_POLICIES: usize = 11;

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[serde(transparent)]
pub struct PolicyId(pub u32);

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a policy card currently lies.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Deck,
    President,
    Chancellor,
    /// Enacted on the liberal track.
    Liberal,
    /// Enacted on the fascist track.
    Fascist,
    Discard,
}

impl Location {
    /// The track a policy of the given party is enacted onto.
    pub fn enacted(party: Party) -> Self {
        match party {
            Party::Liberal => Location::Liberal,
            Party::Fascist => Location::Fascist,
        }
    }

    pub fn is_enacted(self) -> bool {
        matches!(self, Location::Liberal | Location::Fascist)
    }
}

/// A policy card. Its type never changes; only its location does.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct Policy {
    pub id: PolicyId,
    #[serde(rename = "type")]
    pub kind: Party,
    pub location: Location,
    pub timestamp: Timestamp,
}

impl Policy {
    fn move_to(&mut self, location: Location, now: Timestamp) {
        self.location = location;
        self.timestamp = now;
    }
}

/// Builds the full, unshuffled set of policies, all in the draw pile.
pub fn new_deck(now: Timestamp) -> Vec<Policy> {
    let liberal = std::iter::repeat(Party::Liberal).take(LIBERAL_POLICIES);
    let fascist = std::iter::repeat(Party::Fascist).take(FASCIST_POLICIES);
    liberal
        .chain(fascist)
        .enumerate()
        .map(|(idx, kind)| Policy {
            id: PolicyId(idx as u32),
            kind,
            location: Location::Deck,
            timestamp: now,
        })
        .collect()
}

impl GameState {
    /// The policies currently at `location`, in sequence order.
    pub fn policies_at(&self, location: Location) -> impl Iterator<Item = &Policy> {
        self.policies.iter().filter(move |p| p.location == location)
    }

    /// The number of cards in the draw pile.
    pub fn draw_pile(&self) -> usize {
        self.policies_at(Location::Deck).count()
    }

    /// The number of policies enacted for the given party.
    pub fn enacted(&self, party: Party) -> usize {
        self.policies_at(Location::enacted(party)).count()
    }

    /// Peeks at the top `n` cards of the draw pile.
    pub fn top_of_deck(&self, n: usize) -> Vec<&Policy> {
        self.policies_at(Location::Deck).take(n).collect()
    }

    /// The most recently enacted policy, if any.
    pub fn latest_policy(&self) -> Option<&Policy> {
        self.policies
            .iter()
            .filter(|p| p.location.is_enacted())
            .max_by_key(|p| p.timestamp)
    }

    /// Shuffles the whole draw pile. Only used when the game starts.
    pub(super) fn shuffle_draw_pile(&mut self, rng: &mut impl RandomSource) {
        let (mut deck, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.policies)
            .into_iter()
            .partition(|p| p.location == Location::Deck);
        rng.shuffle(&mut deck);
        self.policies = deck.into_iter().chain(rest).collect();
    }

    /// Moves the top `n` cards of the draw pile to `location`.
    pub(super) fn draw(&mut self, n: usize, location: Location, now: Timestamp) -> Result<(), GameError> {
        if self.draw_pile() < n {
            return Err(GameError::InvariantViolation("draw pile exhausted"));
        }
        self.policies
            .iter_mut()
            .filter(|p| p.location == Location::Deck)
            .take(n)
            .for_each(|p| p.move_to(location, now));
        Ok(())
    }

    /// Discards `discarded` from the hand at `hand`, and moves the rest of that hand to `rest`.
    ///
    /// A policy that is not in the hand is rejected before anything moves.
    pub(super) fn discard_from_hand(
        &mut self,
        hand: Location,
        discarded: PolicyId,
        rest: impl Fn(&Policy) -> Location,
        now: Timestamp,
    ) -> Result<(), GameError> {
        if !self.policies_at(hand).any(|p| p.id == discarded) {
            return Err(GameError::InvalidPolicy);
        }
        for policy in self.policies.iter_mut().filter(|p| p.location == hand) {
            let location = if policy.id == discarded {
                Location::Discard
            } else {
                rest(policy)
            };
            policy.move_to(location, now);
        }
        Ok(())
    }

    /// Shuffles the discard pile and places it beneath the remaining draw pile.
    pub(super) fn reshuffle_discards(&mut self, now: Timestamp, rng: &mut impl RandomSource) {
        let (mut discards, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.policies)
            .into_iter()
            .partition(|p| p.location == Location::Discard);
        rng.shuffle(&mut discards);
        for policy in discards.iter_mut() {
            policy.move_to(Location::Deck, now);
        }
        let (deck, rest): (Vec<_>, Vec<_>) = rest.into_iter().partition(|p| p.location == Location::Deck);
        log::debug!("reshuffled {} discarded policies beneath {} in the deck", discards.len(), deck.len());
        self.policies = deck.into_iter().chain(discards).chain(rest).collect();
    }

    /// Enacts the top card of the draw pile directly, bypassing the legislature.
    pub(super) fn enact_top_policy(&mut self, now: Timestamp) -> Result<Party, GameError> {
        let policy = self
            .policies
            .iter_mut()
            .find(|p| p.location == Location::Deck)
            .ok_or(GameError::InvariantViolation("draw pile exhausted"))?;
        policy.move_to(Location::enacted(policy.kind), now);
        Ok(policy.kind)
    }
}
