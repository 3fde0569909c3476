use a68_core::{NodeId, RegistryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Misuse of a [`Session`](crate::Session): problems with what the
/// caller handed in, as opposed to diagnostics about the program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the syntax tree has no root")]
    NoRoot,

    #[error("root {0} is not a node of the syntax tree")]
    UnknownRoot(NodeId),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
