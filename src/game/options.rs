use serde::{Deserialize, Serialize};

/// Optional house rules.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameOptions {
    /// Whether the third consecutive failed ticket enacts the top policy of the deck.
    #[serde(default)]
    pub forced_policy_after_failed_tickets: bool,
}

impl GameOptions {
    /// The number of consecutive failed tickets that forces a policy, if that rule is in play.
    pub fn failed_ticket_limit(&self) -> Option<usize> {
        self.forced_policy_after_failed_tickets.then_some(3)
    }
}
