//! Execution contract and shared data context for the `ai-*` decision engines.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod lifecycle;
pub mod status;
pub mod tick;
pub mod value;

pub use blackboard::{BbKey, Blackboard};
pub use lifecycle::{Hooks, Lifecycle, LifecycleState};
pub use status::Status;
pub use tick::TickContext;
pub use value::{FromValue, Value, ValueError};
