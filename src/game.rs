use self::deck::new_deck;
pub use self::board::ExecutivePower;
pub use self::deck::{Location, Policy, PolicyId};
pub use self::event::Event;
pub use self::options::GameOptions;
pub use self::party::Party;
pub use self::player::{assign_roles, num_fascists, Player, PlayerId, Vote};
pub use self::random::{GameRng, RandomSource};
pub use self::view::RoleKnowledge;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

mod board;
mod deck;
mod election;
mod event;
mod executive_power;
mod legislative;
mod options;
mod party;
mod player;
mod random;
mod test;
mod view;

/// Milliseconds, as supplied by the transport. Must never decrease between calls.
pub type Timestamp = u64;

/// How long an outcome stays on screen before the game auto-advances.
pub const DWELL_TIME: Timestamp = 4000;

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;

/// A game of Secret Hitler.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    is_started: bool,
    failed_votes: usize,
    hitler: Option<PlayerId>,
    phase: Option<Phase>,
    president_candidate: Option<PlayerId>,
    chancellor_candidate: Option<PlayerId>,
    elected_president: Option<PlayerId>,
    elected_chancellor: Option<PlayerId>,
    /// The seat the regular presidential rotation continues from.
    presidential_turn: Option<PlayerId>,
    players: Vec<Player>,
    policies: Vec<Policy>,
    #[serde(default)]
    options: GameOptions,
}

/// The current phase in the game loop, and when it was entered.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct Phase {
    pub name: PhaseName,
    pub timestamp: Timestamp,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseName {
    ViewRoles,
    ElectionStart,
    VoteOnTicket,
    RevealTicketResults,
    LegislativeSessionStart,
    ChancellorPolicyTurn,
    RevealNewPolicy,
    ShuffleDeck,
    RevealPolicies,
    PresidentExamineDeckStart,
    PresidentInvestigateIdentityStart,
    SpecialElectionStart,
    PresidentKillStart,
    RevealKilledPlayer,
    FascistsWinWithHitlerChancellor,
    FascistsWinByPolicy,
    LiberalsWinByPolicy,
    LiberalsWinByHitlerAssassination,
}

impl PhaseName {
    /// The party that has won, if this is a game-over phase.
    pub fn winner(self) -> Option<Party> {
        use PhaseName::*;
        match self {
            FascistsWinWithHitlerChancellor | FascistsWinByPolicy => Some(Party::Fascist),
            LiberalsWinByPolicy | LiberalsWinByHitlerAssassination => Some(Party::Liberal),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.winner().is_some()
    }
}

impl Phase {
    /// Whether the phase has been on screen for longer than the dwell time.
    pub fn has_elapsed(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.timestamp) > DWELL_TIME
    }
}

/// Applies one event to the game, returning the next state.
///
/// Events that are not legal in the current phase return the state unchanged.
/// An `Err` means the event referenced something that does not exist, or the
/// state itself is inconsistent; in either case `state` remains the latest state.
pub fn update(
    state: &GameState,
    event: &Event,
    now: Timestamp,
    rng: &mut impl RandomSource,
) -> Result<GameState, GameError> {
    let mut next = state.clone();
    next.apply(event, now, rng)?;
    Ok(next)
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameOptions::default(), 0)
    }
}

impl GameState {
    /// Creates a fresh game lobby with a full, unshuffled deck.
    pub fn new(options: GameOptions, now: Timestamp) -> Self {
        Self {
            is_started: false,
            failed_votes: 0,
            hitler: None,
            phase: None,
            president_candidate: None,
            chancellor_candidate: None,
            elected_president: None,
            elected_chancellor: None,
            presidential_turn: None,
            players: vec![],
            policies: new_deck(now),
            options,
        }
    }

    fn apply(&mut self, event: &Event, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        if self.is_over() {
            log::trace!("ignoring {} after the game has ended", event.name());
            return Ok(());
        }

        match event {
            Event::StartGame => self.start_game(now, rng),
            Event::PlayerJoin { player_id } => {
                self.add_player(player_id);
                Ok(())
            }
            Event::UpdatePlayerName { player_id, name } => {
                self.player_mut(player_id)?.name = name.clone();
                Ok(())
            }
            Event::RevealRole { player_id } => self.reveal_role(player_id, now, rng),
            Event::SelectChancellorCandidate { player_id } => self.select_chancellor_candidate(player_id, now),
            Event::VoteOnTicket { player_id, vote } => self.cast_vote(player_id, *vote, now),
            Event::PresidentDiscardPolicy { policy_id } => self.president_discard(*policy_id, now),
            Event::ChancellorDiscardPolicy { policy_id } => self.chancellor_discard(*policy_id, now),
            Event::DeckReady => match self.phase_name() {
                Some(PhaseName::ShuffleDeck) => self.end_shuffle(now, rng),
                _ => self.ignore(event),
            },
            Event::DoneExaminingDeck => self.end_examine_deck(now, rng),
            Event::InvestigatePlayer { player_id } => self.investigate_player(player_id, now, rng),
            Event::SelectSpecialPresident { player_id } => self.select_special_president(player_id, now),
            Event::KillPlayer { player_id } => self.kill_player(player_id, now),
            Event::ClockTick => self.clock_tick(now, rng),
        }
    }

    /// Advances whichever timed phase has been on screen for long enough.
    fn clock_tick(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        use PhaseName::*;

        let Some(phase) = self.phase else {
            return Ok(());
        };
        if !phase.has_elapsed(now) {
            return Ok(());
        }

        match phase.name {
            RevealTicketResults => self.end_voting(now),
            RevealNewPolicy => {
                let name = if self.draw_pile() < 3 { ShuffleDeck } else { RevealPolicies };
                self.enter(name, now);
                Ok(())
            }
            ShuffleDeck => self.end_shuffle(now, rng),
            RevealPolicies => self.end_policy_reveal(now, rng),
            RevealKilledPlayer => self.start_election(now, rng),
            ViewRoles
            | ElectionStart
            | VoteOnTicket
            | LegislativeSessionStart
            | ChancellorPolicyTurn
            | PresidentExamineDeckStart
            | PresidentInvestigateIdentityStart
            | SpecialElectionStart
            | PresidentKillStart
            | FascistsWinWithHitlerChancellor
            | FascistsWinByPolicy
            | LiberalsWinByPolicy
            | LiberalsWinByHitlerAssassination => Ok(()),
        }
    }

    /// Assigns roles, shuffles the deck and picks the first presidential candidate.
    fn start_game(&mut self, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        if self.is_started || !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players.len()) {
            log::debug!("cannot start a game with {} players", self.players.len());
            return Ok(());
        }

        let assignment = assign_roles(self.players.len(), rng)
            .ok_or(GameError::InvariantViolation("unsupported player count"))?;
        for (player, role) in self.players.iter_mut().zip(assignment.roles) {
            player.role = Some(role);
        }
        self.hitler = Some(self.players[assignment.hitler].id.clone());
        self.shuffle_draw_pile(rng);

        let president = self.players[rng.index(self.players.len())].id.clone();
        self.presidential_turn = Some(president.clone());
        self.president_candidate = Some(president);
        self.is_started = true;
        self.enter(PhaseName::ViewRoles, now);
        log::info!("game started with {} players", self.players.len());
        Ok(())
    }

    /// Adds a player to the lobby. Re-joining, or joining a started or full game, does nothing.
    fn add_player(&mut self, id: &PlayerId) {
        if self.player(id).is_some() {
            return;
        }
        if self.is_started || self.players.len() >= MAX_PLAYERS {
            log::debug!("player {} cannot join", id);
            return;
        }
        let name = format!("Player {}", self.players.len() + 1);
        self.players.push(Player::new(id.clone(), name));
    }

    /// Toggles whether a player is showing their role; all players having seen theirs ends the night.
    fn reveal_role(&mut self, id: &PlayerId, now: Timestamp, rng: &mut impl RandomSource) -> Result<(), GameError> {
        if !self.is_started {
            return Ok(());
        }
        let player = self.player_mut(id)?;
        player.reveal_role = !player.reveal_role;
        player.seen_role = true;

        if self.phase_name() != Some(PhaseName::ViewRoles) || !self.players.iter().all(|p| p.seen_role) {
            return Ok(());
        }
        if self.president_candidate.is_none() {
            let president = self.random_alive_player(rng)?;
            self.presidential_turn = Some(president.clone());
            self.president_candidate = Some(president);
        }
        self.enter(PhaseName::ElectionStart, now);
        Ok(())
    }

    /// Moves the game to a new phase.
    fn enter(&mut self, name: PhaseName, now: Timestamp) {
        log::debug!("phase {:?} -> {:?}", self.phase_name(), name);
        self.phase = Some(Phase { name, timestamp: now });
    }

    /// Logs and discards an event that is not legal right now.
    fn ignore(&self, event: &Event) -> Result<(), GameError> {
        log::debug!("ignoring {} during {:?}", event.name(), self.phase_name());
        Ok(())
    }

    /// Returns true if the game is over.
    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn fascists_won(&self) -> bool {
        self.winner() == Some(Party::Fascist)
    }

    pub fn liberals_won(&self) -> bool {
        self.winner() == Some(Party::Liberal)
    }

    /// The party that won, if the game is over.
    pub fn winner(&self) -> Option<Party> {
        self.phase_name().and_then(PhaseName::winner)
    }

    /// Returns whether a particular player has won.
    pub fn player_has_won(&self, id: &PlayerId) -> bool {
        match (self.winner(), self.player(id)) {
            (Some(winner), Some(player)) => player.role == Some(winner),
            _ => false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn phase_name(&self) -> Option<PhaseName> {
        self.phase.map(|p| p.name)
    }

    pub fn failed_votes(&self) -> usize {
        self.failed_votes
    }

    pub fn hitler(&self) -> Option<&PlayerId> {
        self.hitler.as_ref()
    }

    pub fn president_candidate(&self) -> Option<&PlayerId> {
        self.president_candidate.as_ref()
    }

    pub fn chancellor_candidate(&self) -> Option<&PlayerId> {
        self.chancellor_candidate.as_ref()
    }

    pub fn elected_president(&self) -> Option<&PlayerId> {
        self.elected_president.as_ref()
    }

    pub fn elected_chancellor(&self) -> Option<&PlayerId> {
        self.elected_chancellor.as_ref()
    }

    pub fn presidential_turn(&self) -> Option<&PlayerId> {
        self.presidential_turn.as_ref()
    }

    pub fn options(&self) -> GameOptions {
        self.options
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Gets the number of players in the game.
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Gets the number of players in the game that are alive.
    pub fn num_players_alive(&self) -> usize {
        self.players.iter().filter(|p| p.alive()).count()
    }

    /// Finds a player with the given id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(GameError::PlayerNotFound)
    }

    fn player_index(&self, id: &PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| &p.id == id)
            .ok_or(GameError::PlayerNotFound)
    }

    /// Finds the next alive player clockwise from `id`, wrapping around.
    fn next_alive_player(&self, id: &PlayerId) -> Result<PlayerId, GameError> {
        let idx = self.player_index(id)?;
        (idx + 1..self.num_players())
            .chain(0..=idx)
            .map(|i| &self.players[i])
            .find(|p| p.alive())
            .map(|p| p.id.clone())
            .ok_or(GameError::InvariantViolation("no players are alive"))
    }

    fn random_alive_player(&self, rng: &mut impl RandomSource) -> Result<PlayerId, GameError> {
        let alive: Vec<_> = self.players.iter().filter(|p| p.alive()).collect();
        if alive.is_empty() {
            return Err(GameError::InvariantViolation("no players are alive"));
        }
        Ok(alive[rng.index(alive.len())].id.clone())
    }

    fn clear_votes(&mut self) {
        for player in self.players.iter_mut() {
            player.vote = None;
        }
    }
}
