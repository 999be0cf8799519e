use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("state `{0}` cannot transition to itself")]
    SelfTransition(String),

    #[error("unknown state `{0}`")]
    UnknownState(String),

    #[error("state `{0}` is already registered")]
    DuplicateState(String),
}

pub type Result<T> = std::result::Result<T, FsmError>;
