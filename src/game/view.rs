use super::party::Party;
use super::player::PlayerId;
use super::GameState;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// In games of at most this many players, Hitler knows who the other fascists are.
const HITLER_KNOWS_FASCISTS_MAX_PLAYERS: usize = 6;

/// What a player learns about everyone else when they look at their role card.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoleKnowledge {
    pub role: Option<Party>,
    pub is_hitler: bool,
    /// The ordinary fascists this player knows about, excluding themselves.
    pub fascists: Vec<PlayerId>,
    /// Hitler, if this player is told who Hitler is.
    pub hitler: Option<PlayerId>,
}

impl GameState {
    /// Works out what the given player knows about the others' roles.
    pub fn role_knowledge(&self, viewer: &PlayerId) -> Result<RoleKnowledge, GameError> {
        let player = self.player(viewer).ok_or(GameError::PlayerNotFound)?;
        let is_hitler = self.hitler.as_ref() == Some(viewer);
        let mut knowledge = RoleKnowledge {
            role: player.role,
            is_hitler,
            fascists: vec![],
            hitler: None,
        };

        let knows_fascists = match player.role {
            Some(Party::Fascist) if is_hitler => self.num_players() <= HITLER_KNOWS_FASCISTS_MAX_PLAYERS,
            Some(Party::Fascist) => true,
            _ => false,
        };
        if !knows_fascists {
            return Ok(knowledge);
        }

        knowledge.fascists = self
            .players
            .iter()
            .filter(|p| p.role == Some(Party::Fascist) && &p.id != viewer && self.hitler.as_ref() != Some(&p.id))
            .map(|p| p.id.clone())
            .collect();
        if !is_hitler {
            knowledge.hitler = self.hitler.clone();
        }
        Ok(knowledge)
    }
}
