//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! - [`core`]: status, tick context, lifecycle and the blackboard shared by every model.
//! - [`bt`]: behavior trees and the node registry.
//! - [`fsm`]: finite state machines.
//! - [`goap`]: goal-oriented action planning.
//!
//! With `full` (the default) the connectors are enabled too, so a tree can run a state machine or
//! an agent as a leaf and vice versa.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub use ai_bt as bt;

#[cfg(feature = "fsm")]
#[cfg_attr(docsrs, doc(cfg(feature = "fsm")))]
pub use ai_fsm as fsm;

#[cfg(feature = "goap")]
#[cfg_attr(docsrs, doc(cfg(feature = "goap")))]
pub use ai_goap as goap;

#[cfg(feature = "core")]
pub use ai_core::{Blackboard, Status, TickContext, Value};
