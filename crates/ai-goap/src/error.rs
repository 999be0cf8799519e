use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoapError {
    #[error("action `{0}` is already registered")]
    DuplicateAction(String),

    #[error("goal `{0}` is already registered")]
    DuplicateGoal(String),
}

pub type Result<T> = std::result::Result<T, GoapError>;
