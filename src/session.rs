use crate::archive::{Archive, GameStats};
use crate::error::GameError;
use crate::game::{update, Event, GameOptions, GameRng, GameState, PlayerId, RoleKnowledge, Timestamp};
use crate::time::now_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Key of the current game in the `games` tree.
const CURRENT_GAME: &[u8] = b"current";

/// The databases that the game is persisted to.
#[derive(Clone)]
struct Dbs {
    game: sled::Tree,
    archive: Archive,
}

/// Everything needed to pick the game up again after a server restart.
#[derive(Serialize, Deserialize)]
struct SavedGame {
    game: GameState,
    rng: GameRng,
    /// When the current game was started, if it has been.
    started: Option<DateTime<Utc>>,
    /// Whether this game has been archived.
    archived: bool,
}

/// The game hosted by this server, together with its random source and subscribers.
///
/// Every event and clock tick goes through [Session::dispatch] while holding the
/// session lock, which is the one place events are put in order.
pub struct Session {
    game: GameState,
    rng: GameRng,
    started: Option<DateTime<Utc>>,
    archived: bool,
    /// The last timestamp given to the reducer.
    last_ts: Timestamp,
    options: GameOptions,
    seed: Option<u64>,
    /// Channel for sending game state updates to clients.
    updates: watch::Sender<Value>,
    dbs: Dbs,
}

pub type SessionHandle = Arc<Mutex<Session>>;

impl SavedGame {
    fn fresh(options: GameOptions, seed: Option<u64>, now: Timestamp) -> Self {
        Self {
            game: GameState::new(options, now),
            rng: seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy),
            started: None,
            archived: false,
        }
    }
}

impl Session {
    /// Opens the session stored in `db`, or a fresh lobby if there is none.
    pub fn open(db: &sled::Db, options: GameOptions, seed: Option<u64>) -> Result<Self, Box<dyn Error>> {
        let dbs = Dbs {
            game: db.open_tree("games")?,
            archive: Archive::open(db)?,
        };
        let now = now_millis(0);
        let saved = match dbs.game.get(CURRENT_GAME)? {
            Some(bytes) => match serde_json::from_slice::<SavedGame>(&bytes) {
                Ok(saved) => {
                    log::info!("resuming saved game in phase {:?}", saved.game.phase_name());
                    if saved.game.options() != options {
                        log::warn!(
                            "saved game keeps its options {:?}; {:?} apply from the next restart",
                            saved.game.options(),
                            options
                        );
                    }
                    saved
                }
                Err(err) => {
                    log::warn!("discarding unreadable saved game: {}", err);
                    SavedGame::fresh(options, seed, now)
                }
            },
            None => SavedGame::fresh(options, seed, now),
        };
        let last_ts = saved.game.phase().map_or(now, |phase| phase.timestamp.max(now));

        Ok(Self::hydrate(saved, last_ts, options, seed, dbs))
    }

    fn hydrate(saved: SavedGame, last_ts: Timestamp, options: GameOptions, seed: Option<u64>, dbs: Dbs) -> Self {
        let mut session = Self {
            game: saved.game,
            rng: saved.rng,
            started: saved.started,
            archived: saved.archived,
            last_ts,
            options,
            seed,
            updates: watch::channel(Value::Null).0,
            dbs,
        };
        session.notify();
        session
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Applies an event at the current time.
    pub fn dispatch(&mut self, event: &Event) -> Result<(), GameError> {
        let now = now_millis(self.last_ts);
        self.dispatch_at(event, now)
    }

    /// Applies an event to the game; if anything changed, the new state is
    /// broadcast, persisted, and archived once the game is over.
    ///
    /// On error both the game and the random source are left as they were.
    pub fn dispatch_at(&mut self, event: &Event, now: Timestamp) -> Result<(), GameError> {
        let now = now.max(self.last_ts);
        self.last_ts = now;

        let mut rng = self.rng.clone();
        let next = update(&self.game, event, now, &mut rng).map_err(|err| {
            log::error!("rejected {}: {}", event.name(), err);
            err
        })?;
        self.rng = rng;
        if next == self.game {
            return Ok(());
        }

        if self.started.is_none() && next.is_started() {
            self.started = Some(Utc::now());
        }
        self.game = next;
        self.notify();
        if let Err(err) = self.archive() {
            log::error!("could not archive game: {}", err);
        }
        if let Err(err) = self.persist_game() {
            log::error!("could not persist game: {}", err);
        }
        Ok(())
    }

    /// Throws the current game away and opens a fresh lobby.
    pub fn restart(&mut self) {
        let now = now_millis(self.last_ts);
        let fresh = SavedGame::fresh(self.options, self.seed, now);
        self.game = fresh.game;
        self.rng = fresh.rng;
        self.started = None;
        self.archived = false;
        self.last_ts = now;
        log::info!("game restarted");

        self.notify();
        if let Err(err) = self.persist_game() {
            log::error!("could not persist game: {}", err);
        }
    }

    /// Returns a stream of state updates, starting with the current state.
    pub fn subscribe(&mut self) -> watch::Receiver<Value> {
        let rx = self.updates.subscribe();
        self.notify();
        rx
    }

    /// What a player can see of the others' roles.
    pub fn role_knowledge(&self, id: &PlayerId) -> Result<RoleKnowledge, GameError> {
        self.game.role_knowledge(id)
    }

    pub fn past_games(&self) -> Vec<(u64, GameStats)> {
        self.dbs.archive.past_games()
    }

    /// The message pushed to every client when the state changes.
    pub fn snapshot(&self) -> Value {
        json!({
            "type": "UPDATE_GAME_STATE",
            "body": { "game": self.game }
        })
    }

    /// Notifies all connected clients of the new game state.
    fn notify(&mut self) {
        self.updates.send_replace(self.snapshot());
    }

    /// Persists the game state to disk, so it can be recovered upon server restart.
    fn persist_game(&mut self) -> Result<(), Box<dyn Error>> {
        let saved = SavedGame {
            game: self.game.clone(),
            rng: self.rng.clone(),
            started: self.started,
            archived: self.archived,
        };
        self.dbs.game.insert(CURRENT_GAME, serde_json::to_vec(&saved)?)?;
        Ok(())
    }

    /// Archives the game if it is over and hasn't been archived yet.
    fn archive(&mut self) -> Result<(), Box<dyn Error>> {
        if self.archived {
            return Ok(());
        }
        let now = Utc::now();
        let Some(stats) = GameStats::new(&self.game, self.started.unwrap_or(now), now) else {
            return Ok(());
        };
        self.dbs.archive.record(&stats)?;
        self.archived = true;
        Ok(())
    }
}

/// Drives the clock: delivers a tick to the session every `interval`.
pub async fn run_clock(session: SessionHandle, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if !tick(&session) {
            return;
        }
    }
}

/// Delivers one clock tick. Returns `false` once the session can no longer be used.
fn tick(session: &SessionHandle) -> bool {
    let Ok(mut session) = session.lock() else {
        log::error!("session lock is poisoned, stopping the clock");
        return false;
    };
    session.dispatch(&Event::ClockTick).ok();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PhaseName, Vote};

    fn temp_db() -> sled::Db {
        sled::Config::new().temporary(true).open().unwrap()
    }

    fn join(session: &mut Session, n: usize) {
        for i in 0..n {
            let player_id = PlayerId(format!("p{}", i));
            session.dispatch_at(&Event::PlayerJoin { player_id }, 0).unwrap();
        }
    }

    #[test]
    fn fresh_session_is_a_lobby() {
        let db = temp_db();
        let session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        assert!(!session.game().is_started());
        assert_eq!(session.game().num_players(), 0);
        assert_eq!(session.snapshot()["type"], "UPDATE_GAME_STATE");
    }

    #[test]
    fn game_survives_a_restart_of_the_server() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        join(&mut session, 5);
        session.dispatch(&Event::StartGame).unwrap();
        let game = session.game().clone();
        let rng = session.rng.clone();
        drop(session);

        let reopened = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        assert_eq!(reopened.game(), &game);
        assert_eq!(serde_json::to_value(&reopened.rng).unwrap(), serde_json::to_value(&rng).unwrap());
        assert!(reopened.started.is_some());
    }

    #[test]
    fn resumed_game_keeps_its_own_options() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        join(&mut session, 3);
        drop(session);

        let forced = GameOptions {
            forced_policy_after_failed_tickets: true,
        };
        let mut reopened = Session::open(&db, forced, Some(1)).unwrap();
        assert_eq!(reopened.game().options(), GameOptions::default());
        assert_eq!(reopened.game().num_players(), 3);

        reopened.restart();
        assert_eq!(reopened.game().options(), forced);
    }

    #[test]
    fn subscribers_see_changes() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        let mut rx = session.subscribe();
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        // Ticking an idle lobby changes nothing, so nothing is sent
        session.dispatch(&Event::ClockTick).unwrap();
        assert!(!rx.has_changed().unwrap());

        join(&mut session, 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow()["body"]["game"]["players"][0]["id"], "p0");
    }

    #[test]
    fn rejected_events_leave_the_session_alone() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        join(&mut session, 5);
        let before = session.game().clone();

        let result = session.dispatch(&Event::VoteOnTicket {
            player_id: PlayerId::from("ghost"),
            vote: Vote::Ja,
        });
        assert_eq!(result, Ok(()));
        let result = session.dispatch(&Event::UpdatePlayerName {
            player_id: PlayerId::from("ghost"),
            name: "Boo".to_string(),
        });
        assert_eq!(result, Err(GameError::PlayerNotFound));
        assert_eq!(session.game(), &before);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        join(&mut session, 5);
        session.dispatch_at(&Event::StartGame, 1_000_000_000_000_000).unwrap();
        session.dispatch_at(&Event::RevealRole { player_id: PlayerId::from("p0") }, 5).unwrap();

        let phase = session.game().phase().unwrap();
        assert_eq!(phase.name, PhaseName::ViewRoles);
        assert_eq!(phase.timestamp, 1_000_000_000_000_000);
        assert_eq!(session.last_ts, 1_000_000_000_000_000);
    }

    #[test]
    fn finished_games_are_archived_once() {
        let db = temp_db();
        let mut session = Session::open(&db, GameOptions::default(), Some(1)).unwrap();
        join(&mut session, 5);
        session.dispatch(&Event::StartGame).unwrap();

        // Jump straight to an execution and shoot Hitler
        let hitler = session.game().hitler().cloned().unwrap();
        let president = session
            .game()
            .players()
            .iter()
            .map(|p| p.id.clone())
            .find(|id| id != &hitler)
            .unwrap();
        let mut state = serde_json::to_value(session.game()).unwrap();
        state["phase"] = json!({ "name": "PRESIDENT_KILL_START", "timestamp": 0 });
        state["electedPresident"] = json!(president);
        session.game = serde_json::from_value(state).unwrap();

        session.dispatch(&Event::KillPlayer { player_id: hitler }).unwrap();
        assert!(session.game().liberals_won());

        session.dispatch(&Event::ClockTick).unwrap();
        let past = session.past_games();
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].1.outcome, PhaseName::LiberalsWinByHitlerAssassination);
        assert_eq!(past[0].1.players.len(), 5);

        session.restart();
        assert!(!session.game().is_started());
        assert_eq!(session.past_games().len(), 1);
    }
}
