use serde::{Deserialize, Serialize};
use std::fmt;

/// The two political parties of the game; also the two kinds of policy card.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Liberal,
    Fascist,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Liberal => write!(f, "liberal"),
            Party::Fascist => write!(f, "fascist"),
        }
    }
}
