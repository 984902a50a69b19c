use super::player::PlayerId;
use super::random::RandomSource;
use super::{GameState, PhaseName, Timestamp};
use crate::error::GameError;

impl GameState {
    /// Called when the president has finished looking at the top of the deck.
    pub(super) fn end_examine_deck(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::PresidentExamineDeckStart) {
            return Ok(());
        }
        self.start_election(now, rng)
    }

    /// Called when the president chooses a player to investigate.
    pub(super) fn investigate_player(
        &mut self,
        id: &PlayerId,
        now: Timestamp,
        rng: &mut impl RandomSource,
    ) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::PresidentInvestigateIdentityStart) {
            return Ok(());
        }
        self.check_power_target(id)?;
        let player = self.player_mut(id)?;
        if player.investigated {
            return Err(GameError::InvalidPlayerChoice);
        }
        player.investigated = true;
        self.start_election(now, rng)
    }

    /// Called when the president picks the next presidential candidate.
    ///
    /// The regular rotation is left where it was, so it resumes after this election.
    pub(super) fn select_special_president(&mut self, id: &PlayerId, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::SpecialElectionStart) {
            return Ok(());
        }
        self.check_power_target(id)?;
        self.begin_election(id.clone(), now);
        Ok(())
    }

    /// Called when the president executes a player.
    pub(super) fn kill_player(&mut self, id: &PlayerId, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::PresidentKillStart) {
            return Ok(());
        }
        self.check_power_target(id)?;
        let player = self.player_mut(id)?;
        player.killed = true;
        player.killed_at = Some(now);
        log::info!("player {} was killed", id);

        if self.hitler.as_ref() == Some(id) {
            self.enter(PhaseName::LiberalsWinByHitlerAssassination, now);
        } else {
            self.enter(PhaseName::RevealKilledPlayer, now);
        }
        Ok(())
    }

    /// The president may only target living players other than themselves.
    fn check_power_target(&self, id: &PlayerId) -> Result<(), GameError> {
        let player = self.player(id).ok_or(GameError::PlayerNotFound)?;
        if !player.alive() || self.elected_president.as_ref() == Some(id) {
            return Err(GameError::InvalidPlayerChoice);
        }
        Ok(())
    }
}
