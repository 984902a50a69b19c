use thiserror::Error;

/// The result of submitting an event that the [GameState](crate::game::GameState) cannot accept.
///
/// Events that are merely out of phase are not errors; they leave the state unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no player exists with the given id")]
    PlayerNotFound,
    #[error("this player cannot be chosen for this action")]
    InvalidPlayerChoice,
    #[error("the chosen policy is not in the expected hand")]
    InvalidPolicy,
    #[error("game state is inconsistent: {0}")]
    InvariantViolation(&'static str),
}
