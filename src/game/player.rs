use super::party::Party;
use super::random::RandomSource;
use super::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a player, minted by the transport before they join.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A ballot on the current ticket.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Ja,
    Nein,
}

/// A game player.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Option<Party>,
    pub vote: Option<Vote>,
    pub reveal_role: bool,
    pub seen_role: bool,
    pub killed: bool,
    pub killed_at: Option<Timestamp>,
    #[serde(default)]
    pub investigated: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            role: None,
            vote: None,
            reveal_role: false,
            seen_role: false,
            killed: false,
            killed_at: None,
            investigated: false,
        }
    }

    pub fn alive(&self) -> bool {
        !self.killed
    }
}

/// The number of ordinary fascists (excluding Hitler) for a given player count.
fn num_ordinary_fascists(num_players: usize) -> Option<usize> {
    match num_players {
        5 | 6 => Some(1),
        7 | 8 => Some(2),
        9 | 10 => Some(3),
        _ => None,
    }
}

/// The total number of fascists, Hitler included, for a given player count.
pub fn num_fascists(num_players: usize) -> Option<usize> {
    num_ordinary_fascists(num_players).map(|n| n + 1)
}

/// The outcome of role assignment: who is Hitler, and the party of every seat.
#[derive(Debug)]
pub struct RoleAssignment {
    pub hitler: usize,
    pub roles: Vec<Party>,
}

/// Secretly partitions `num_players` seats into Hitler, ordinary fascists and liberals.
///
/// Each draw is uniform over the seats not yet assigned. Returns `None` for an
/// unsupported player count.
pub fn assign_roles(num_players: usize, rng: &mut impl RandomSource) -> Option<RoleAssignment> {
    let num_fascists = num_fascists(num_players)?;
    let mut pool: Vec<usize> = (0..num_players).collect();
    let mut roles = vec![Party::Liberal; num_players];

    let hitler = pool.remove(rng.index(pool.len()));
    roles[hitler] = Party::Fascist;
    for _ in 1..num_fascists {
        let seat = pool.remove(rng.index(pool.len()));
        roles[seat] = Party::Fascist;
    }

    Some(RoleAssignment { hitler, roles })
}
