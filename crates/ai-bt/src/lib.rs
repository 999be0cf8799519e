//! Behavior Tree runtime built on `ai-core`.
//!
//! Trees live in an arena ([`BehaviorTree`]) assembled either in code through [`TreeBuilder`] or
//! from a declarative [`TreeSpec`] through a [`Registry`] of node factories.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod leaf;
pub mod registry;
pub mod tree;

pub use ai_core::{Blackboard, Status, TickContext};
pub use bt::{Node, NodeCx, NodeId};
pub use composite::{
    Fallback, IfThenElse, MemoryFallback, MemorySequence, Parallel, ParallelPolicy,
    ReactiveFallback, ReactiveSequence, Sequence, Switch, WhileDoElse,
};
pub use decorator::{
    Cooldown, FireAndForget, ForceFailure, ForceSuccess, Inverter, Repeat, RepeatCondition, Retry,
    Timeout,
};
pub use error::BuildError;
pub use leaf::{Action, Callback, Condition, SubTree, Timer, Wait};
pub use registry::{BuildArgs, NodeBuilder, NodeSpec, Registry, TreeSpec};
pub use tree::{BehaviorTree, TreeBuilder};
