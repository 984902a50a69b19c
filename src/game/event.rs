use super::deck::PolicyId;
use super::player::{PlayerId, Vote};
use serde::{Deserialize, Serialize};

/// Everything that can happen to a game, including the periodic clock tick.
///
/// On the wire an event is `{"type": "VOTE_ON_TICKET", "body": {"playerId": "...", "vote": "ja"}}`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type", content = "body", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    StartGame,
    #[serde(rename_all = "camelCase")]
    PlayerJoin { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    UpdatePlayerName { player_id: PlayerId, name: String },
    #[serde(rename_all = "camelCase")]
    RevealRole { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    SelectChancellorCandidate { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    VoteOnTicket { player_id: PlayerId, vote: Vote },
    #[serde(rename_all = "camelCase")]
    PresidentDiscardPolicy { policy_id: PolicyId },
    #[serde(rename_all = "camelCase")]
    ChancellorDiscardPolicy { policy_id: PolicyId },
    DeckReady,
    DoneExaminingDeck,
    #[serde(rename_all = "camelCase")]
    InvestigatePlayer { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    SelectSpecialPresident { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    KillPlayer { player_id: PlayerId },
    ClockTick,
}

impl Event {
    /// The wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartGame => "START_GAME",
            Event::PlayerJoin { .. } => "PLAYER_JOIN",
            Event::UpdatePlayerName { .. } => "UPDATE_PLAYER_NAME",
            Event::RevealRole { .. } => "REVEAL_ROLE",
            Event::SelectChancellorCandidate { .. } => "SELECT_CHANCELLOR_CANDIDATE",
            Event::VoteOnTicket { .. } => "VOTE_ON_TICKET",
            Event::PresidentDiscardPolicy { .. } => "PRESIDENT_DISCARD_POLICY",
            Event::ChancellorDiscardPolicy { .. } => "CHANCELLOR_DISCARD_POLICY",
            Event::DeckReady => "DECK_READY",
            Event::DoneExaminingDeck => "DONE_EXAMINING_DECK",
            Event::InvestigatePlayer { .. } => "INVESTIGATE_PLAYER",
            Event::SelectSpecialPresident { .. } => "SELECT_SPECIAL_PRESIDENT",
            Event::KillPlayer { .. } => "KILL_PLAYER",
            Event::ClockTick => "CLOCK_TICK",
        }
    }
}
