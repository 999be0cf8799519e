use thiserror::Error;

/// Configuration errors raised while assembling a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),

    #[error("node `{parent}` references unknown node `{child}`")]
    UnknownNode { parent: String, child: String },

    #[error("root node `{0}` is not defined")]
    UnknownRoot(String),

    #[error("node id {0} does not exist in this builder")]
    UnknownNodeId(usize),

    #[error("node `{0}` is defined more than once")]
    DuplicateNode(String),

    #[error("node kind `{0}` is already registered")]
    DuplicateKind(String),

    #[error("sub-tree `{0}` is already registered")]
    DuplicateTree(String),

    #[error("unknown sub-tree `{0}`")]
    UnknownTree(String),

    #[error("node `{0}` has more than one parent")]
    SharedChild(String),

    #[error("node `{0}` is part of a reference cycle")]
    Cycle(String),

    #[error("`{kind}` expects {expected} children, got {found}")]
    ChildCount {
        kind: String,
        expected: String,
        found: usize,
    },

    #[error("node `{node}` is missing parameter `{param}`")]
    MissingParam { node: String, param: String },

    #[error("node `{node}` has an invalid `{param}` parameter: {reason}")]
    InvalidParam {
        node: String,
        param: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;
