use super::deck::{Location, PolicyId};
use super::random::RandomSource;
use super::{ExecutivePower, GameState, Party, PhaseName, Timestamp};
use crate::error::GameError;

impl GameState {
    /// Called when the president discards one of the three drawn policies.
    pub(super) fn president_discard(&mut self, policy: PolicyId, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::LegislativeSessionStart) {
            return Ok(());
        }
        self.discard_from_hand(Location::President, policy, |_| Location::Chancellor, now)?;
        self.enter(PhaseName::ChancellorPolicyTurn, now);
        Ok(())
    }

    /// Called when the chancellor discards one of their two policies, enacting the other.
    pub(super) fn chancellor_discard(&mut self, policy: PolicyId, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::ChancellorPolicyTurn) {
            return Ok(());
        }
        self.discard_from_hand(Location::Chancellor, policy, |p| Location::enacted(p.kind), now)?;
        self.enter(PhaseName::RevealNewPolicy, now);
        Ok(())
    }

    /// Shuffles the discard pile back into the deck once the board is done animating it.
    pub(super) fn end_shuffle(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        self.reshuffle_discards(now, rng);
        self.enter(PhaseName::RevealPolicies, now);
        Ok(())
    }

    /// Called once the policy tracks have been shown; checks for victory, then
    /// hands the president any power the new policy unlocked.
    pub(super) fn end_policy_reveal(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        match self.check_tracks() {
            Some(Party::Liberal) => {
                self.enter(PhaseName::LiberalsWinByPolicy, now);
                return Ok(());
            }
            Some(Party::Fascist) => {
                self.enter(PhaseName::FascistsWinByPolicy, now);
                return Ok(());
            }
            None => {}
        }

        let fascist_enacted = self.latest_policy().map(|p| p.kind) == Some(Party::Fascist);
        let power = ExecutivePower::unlocked(self.num_players(), self.enacted(Party::Fascist));
        match power {
            Some(power) if fascist_enacted && self.elected_president.is_some() => {
                log::info!("president unlocked {:?}", power);
                self.enter(power.phase(), now);
                Ok(())
            }
            _ => self.start_election(now, rng),
        }
    }
}
