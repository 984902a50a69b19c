use super::deck::Location;
use super::player::{PlayerId, Vote};
use super::random::RandomSource;
use super::{GameState, PhaseName, Timestamp};
use crate::error::GameError;

impl GameState {
    /// Whether the given player may be nominated as chancellor by the current presidential candidate.
    ///
    /// The last elected chancellor is always term-limited; the last elected
    /// president only while more than five players are alive.
    pub fn is_eligible_chancellor(&self, id: &PlayerId) -> bool {
        let Some(player) = self.player(id) else {
            return false;
        };
        if !player.alive() || self.president_candidate.as_ref() == Some(id) {
            return false;
        }
        if self.elected_chancellor.as_ref() == Some(id) {
            return false;
        }
        if self.num_players_alive() > 5 && self.elected_president.as_ref() == Some(id) {
            return false;
        }
        true
    }

    /// Determines which players are eligible to be chancellor.
    pub fn eligible_chancellors(&self) -> Vec<&PlayerId> {
        self.players
            .iter()
            .map(|p| &p.id)
            .filter(|id| self.is_eligible_chancellor(id))
            .collect()
    }

    /// Called when the presidential candidate nominates their chancellor.
    pub(super) fn select_chancellor_candidate(&mut self, id: &PlayerId, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::ElectionStart) {
            return Ok(());
        }
        self.player_index(id)?;
        if !self.is_eligible_chancellor(id) {
            return Err(GameError::InvalidPlayerChoice);
        }
        self.chancellor_candidate = Some(id.clone());
        self.clear_votes();
        self.enter(PhaseName::VoteOnTicket, now);
        Ok(())
    }

    /// Called when a player casts their vote. Dead players and second votes are ignored.
    pub(super) fn cast_vote(&mut self, id: &PlayerId, vote: Vote, now: Timestamp) -> Result<(), GameError> {
        if self.phase_name() != Some(PhaseName::VoteOnTicket) {
            return Ok(());
        }
        let player = self.player_mut(id)?;
        if !player.alive() || player.vote.is_some() {
            log::debug!("ignoring vote from {}", id);
            return Ok(());
        }
        player.vote = Some(vote);

        let waiting = self.players.iter().filter(|p| p.alive() && p.vote.is_none()).count();
        if waiting == 0 {
            self.enter(PhaseName::RevealTicketResults, now);
        }
        Ok(())
    }

    /// Returns `true` iff a strict majority of the living players voted ja.
    pub fn ticket_passes(&self) -> bool {
        let ja = self
            .players
            .iter()
            .filter(|p| p.alive() && p.vote == Some(Vote::Ja))
            .count();
        ja * 2 > self.num_players_alive()
    }

    /// Called once the vote has been on screen long enough; tallies it and moves on.
    pub(super) fn end_voting(&mut self, now: Timestamp) -> Result<(), GameError> {
        let passed = self.ticket_passes();
        self.clear_votes();
        if passed {
            self.elect_ticket(now)
        } else {
            self.fail_ticket(now)
        }
    }

    fn elect_ticket(&mut self, now: Timestamp) -> Result<(), GameError> {
        let president = self
            .president_candidate
            .take()
            .ok_or(GameError::InvariantViolation("no presidential candidate"))?;
        let chancellor = self
            .chancellor_candidate
            .take()
            .ok_or(GameError::InvariantViolation("no chancellor candidate"))?;
        let hitler_elected = self.hitler.as_ref() == Some(&chancellor);
        self.elected_president = Some(president);
        self.elected_chancellor = Some(chancellor);
        self.failed_votes = 0;

        if hitler_elected && self.hitler_chancellor_wins() {
            self.enter(PhaseName::FascistsWinWithHitlerChancellor, now);
            return Ok(());
        }

        self.draw(3, Location::President, now)?;
        self.enter(PhaseName::LegislativeSessionStart, now);
        Ok(())
    }

    fn fail_ticket(&mut self, now: Timestamp) -> Result<(), GameError> {
        self.failed_votes += 1;

        if let Some(limit) = self.options.failed_ticket_limit() {
            if self.failed_votes >= limit {
                return self.force_policy(now);
            }
        }

        let current = self
            .president_candidate
            .as_ref()
            .ok_or(GameError::InvariantViolation("no presidential candidate"))?;
        let president = self.next_alive_player(current)?;
        // A special president's seat is outside the rotation, which stays put
        if self.presidential_turn.as_ref() == Some(current) {
            self.presidential_turn = Some(president.clone());
        }

        // The old chancellor nominee cannot share a ticket with themselves
        if self.chancellor_candidate.as_ref() == Some(&president) {
            self.chancellor_candidate = None;
            self.president_candidate = Some(president);
            self.enter(PhaseName::ElectionStart, now);
        } else {
            self.president_candidate = Some(president);
            self.enter(PhaseName::VoteOnTicket, now);
        }
        Ok(())
    }

    /// Enacts the top policy after too many failed tickets. Term limits are forgotten.
    fn force_policy(&mut self, now: Timestamp) -> Result<(), GameError> {
        let party = self.enact_top_policy(now)?;
        log::info!("too many failed tickets, enacted a {} policy from the deck", party);
        self.failed_votes = 0;
        self.president_candidate = None;
        self.chancellor_candidate = None;
        self.elected_president = None;
        self.elected_chancellor = None;
        self.enter(PhaseName::RevealNewPolicy, now);
        Ok(())
    }

    /// Starts the next regular election, with the presidency passing clockwise.
    pub(super) fn start_election(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        let president = match &self.presidential_turn {
            Some(last) => self.next_alive_player(last)?,
            None => self.random_alive_player(rng)?,
        };
        self.presidential_turn = Some(president.clone());
        self.begin_election(president, now);
        Ok(())
    }

    /// Opens the nomination for the given presidential candidate.
    pub(super) fn begin_election(&mut self, president: PlayerId, now: Timestamp) {
        self.president_candidate = Some(president);
        self.chancellor_candidate = None;
        self.clear_votes();
        self.enter(PhaseName::ElectionStart, now);
    }
}
