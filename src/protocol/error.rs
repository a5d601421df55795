use super::Role;
use crate::config::ConfigError;
use crate::graph::ColoringError;
use crate::zk::PermutationError;

/// Errors that abort a proof run locally
///
/// Failures the counterpart has to see are carried in
/// [`ResponseError`](super::ResponseError) instead.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("{role} cannot {action} while in state {state}")]
    UnexpectedState {
        role: Role,
        action: &'static str,
        state: String,
    },

    #[error("channel from {0} closed before the round completed")]
    ChannelClosed(Role),

    #[error("{role} expected a {expected} message, received a {received}")]
    UnexpectedPayload {
        role: Role,
        expected: &'static str,
        received: &'static str,
    },

    #[error("graph has no pair to challenge")]
    NoChallengeAvailable,

    #[error(transparent)]
    Coloring(#[from] ColoringError),

    #[error("witness construction failed: {0}")]
    Witness(#[from] PermutationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("actor task failed: {0}")]
    TaskFailed(String),
}
