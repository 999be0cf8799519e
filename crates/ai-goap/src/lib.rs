//! Goal-oriented action planning over `ai-core` world states.
//!
//! Actions declare [`Requirements`] and [`Effects`] over named values; the [`Planner`] runs A*
//! from the current [`WorldState`] to a [`Goal`], and the [`Agent`] picks goals, plans and
//! executes the plan under the shared execution contract.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod error;
pub mod goal;
pub mod planner;
pub mod world;

#[cfg(feature = "bt")]
#[cfg_attr(docsrs, doc(cfg(feature = "bt")))]
pub mod bt;

#[cfg(feature = "fsm")]
#[cfg_attr(docsrs, doc(cfg(feature = "fsm")))]
pub mod fsm;

pub use action::{Action, ActionCx, ActionDef, ActionId, SimpleAction};
pub use agent::{Agent, AgentConfig};
pub use error::GoapError;
pub use goal::{Goal, Priority};
pub use planner::{Plan, Planner, PlannerConfig, Search};
pub use world::{Effect, Effects, Requirement, Requirements, WorldState};
