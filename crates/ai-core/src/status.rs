#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    Running,
    Success,
    Failure,
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Running
    }

    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Swap `Success` and `Failure`; `Running` is returned unchanged.
    pub fn invert(self) -> Self {
        match self {
            Status::Running => Status::Running,
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
