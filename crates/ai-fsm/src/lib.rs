//! Finite state machine over the shared `ai-core` blackboard.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod error;
pub mod machine;
pub mod state;
pub mod transition;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub mod bt;

pub use error::FsmError;
pub use machine::{Cause, StateMachine};
pub use state::{CallbackState, State};
pub use transition::Transition;
