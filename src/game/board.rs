use super::party::Party;
use super::{GameState, PhaseName};

pub const MAX_LIBERAL_CARDS: usize = 5;
pub const MAX_FASCIST_CARDS: usize = 6;

/// The fascist policy count from which electing Hitler as chancellor wins the game.
pub const HITLER_CHANCELLOR_THRESHOLD: usize = 3;

/// A presidential power unlocked by enacting a fascist policy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecutivePower {
    /// The president must investigate a player's loyalty.
    InvestigatePlayer,
    /// The president must call a special election.
    SpecialElection,
    /// The president must peek at the top three cards on the deck.
    ExamineDeck,
    /// The president must execute a player.
    Execution,
}

impl ExecutivePower {
    /// Gets the power unlocked by the `fascist_cards`th fascist policy in a game of `num_players`.
    pub fn unlocked(num_players: usize, fascist_cards: usize) -> Option<Self> {
        use ExecutivePower::*;
        match (num_players, fascist_cards) {
            (0..=6, 3) => Some(ExamineDeck),
            (7..=8, 2) => Some(InvestigatePlayer),
            (9..=10, 1..=2) => Some(InvestigatePlayer),
            (7..=10, 3) => Some(SpecialElection),
            (_, 4..=5) => Some(Execution),
            _ => None,
        }
    }

    /// The phase in which the president exercises this power.
    pub fn phase(self) -> PhaseName {
        match self {
            ExecutivePower::InvestigatePlayer => PhaseName::PresidentInvestigateIdentityStart,
            ExecutivePower::SpecialElection => PhaseName::SpecialElectionStart,
            ExecutivePower::ExamineDeck => PhaseName::PresidentExamineDeckStart,
            ExecutivePower::Execution => PhaseName::PresidentKillStart,
        }
    }
}

impl GameState {
    /// Checks whether either party has completed their policy track.
    pub fn check_tracks(&self) -> Option<Party> {
        if self.enacted(Party::Liberal) >= MAX_LIBERAL_CARDS {
            return Some(Party::Liberal);
        }
        if self.enacted(Party::Fascist) >= MAX_FASCIST_CARDS {
            return Some(Party::Fascist);
        }
        None
    }

    /// Whether electing Hitler as chancellor now ends the game.
    pub fn hitler_chancellor_wins(&self) -> bool {
        self.enacted(Party::Fascist) >= HITLER_CHANCELLOR_THRESHOLD
    }
}
