use std::collections::BTreeSet;

use ai_core::{Lifecycle, Status, TickContext};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::action::{Action, ActionCx, ActionId};
use crate::error::{GoapError, Result};
use crate::goal::Goal;
use crate::planner::{Plan, Planner, PlannerConfig};
use crate::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Seconds between scheduled replans while a plan is running.
    pub replan_interval: f32,
    pub planner: PlannerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            replan_interval: 1.0,
            planner: PlannerConfig::default(),
        }
    }
}

struct Slot {
    action: Box<dyn Action>,
    lifecycle: Lifecycle,
}

/// Picks goals, plans for them and executes the plan one action at a time.
///
/// A replan happens when there is no plan, the plan ran out, its goal is already satisfied or the
/// replan cooldown expired. A planning attempt that finds nothing leaves the agent idle until the
/// cooldown expires again. Before each tick the next action's requirements are re-checked against
/// the live world; a mismatch or an action failure drops the plan and the next tick replans.
pub struct Agent {
    config: AgentConfig,
    planner: Planner,
    actions: Vec<Slot>,
    goals: Vec<Goal>,
    plan: Option<Plan>,
    active: BTreeSet<ActionId>,
    cooldown: f32,
    // Set after a planning attempt produced no plan.
    waiting: bool,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            planner: Planner::new(),
            actions: Vec::new(),
            goals: Vec::new(),
            plan: None,
            active: BTreeSet::new(),
            cooldown: 0.0,
            waiting: false,
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self.planner = Planner::new().with_config(config.planner);
        self
    }

    pub fn config(&self) -> AgentConfig {
        self.config
    }

    pub fn add_action(&mut self, action: impl Action) -> Result<ActionId> {
        if self.find_action(action.name()).is_some() {
            return Err(GoapError::DuplicateAction(action.name().to_owned()));
        }
        let id = ActionId::new(self.actions.len());
        self.actions.push(Slot {
            action: Box::new(action),
            lifecycle: Lifecycle::new(),
        });
        Ok(id)
    }

    pub fn add_goal(&mut self, goal: Goal) -> Result<()> {
        if self.goals.iter().any(|g| g.name() == goal.name()) {
            return Err(GoapError::DuplicateGoal(goal.name().to_owned()));
        }
        self.goals.push(goal);
        Ok(())
    }

    pub fn find_action(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|s| s.action.name() == name)
            .map(ActionId::new)
    }

    pub fn action(&self, id: ActionId) -> Option<&dyn Action> {
        self.actions.get(id.index()).map(|s| s.action.as_ref())
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn current_goal(&self) -> Option<&str> {
        self.plan.as_ref().map(Plan::goal)
    }

    pub fn is_action_running(&self, id: ActionId) -> bool {
        self.actions
            .get(id.index())
            .is_some_and(|s| s.lifecycle.is_running())
    }

    pub fn active_actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.active.iter().copied()
    }

    /// Seconds until the next scheduled replan.
    pub fn replan_cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Advance the agent by one frame. Returns the status of the action ticked this frame, or
    /// `None` when no action ran.
    pub fn tick(&mut self, ctx: &TickContext, world: &mut WorldState) -> Option<Status> {
        self.cooldown -= ctx.dt_seconds;
        let actions = &self.actions;
        self.active
            .retain(|id| actions[id.index()].lifecycle.is_running());

        if self.should_replan(world) {
            self.replan(ctx, world);
        }

        let id = self.plan.as_ref()?.next()?;
        let slot = &mut self.actions[id.index()];
        if !slot.action.requirements().is_met(world) {
            debug!(
                action = slot.action.name(),
                reason = "requirements no longer met",
                "aborting plan"
            );
            self.abort(ctx, world);
            return None;
        }

        let status = {
            let mut cx = ActionCx {
                tick: ctx,
                world: &mut *world,
            };
            slot.lifecycle.tick(slot.action.as_mut(), &mut cx)
        };
        trace!(action = slot.action.name(), ?status, "action ticked");

        match status {
            Status::Running => {
                self.active.insert(id);
            }
            Status::Success => {
                slot.action.effects().apply(world);
                self.active.remove(&id);
                if let Some(plan) = self.plan.as_mut() {
                    plan.advance();
                }
            }
            Status::Failure => {
                debug!(action = slot.action.name(), reason = "action failed", "aborting plan");
                self.active.remove(&id);
                self.abort(ctx, world);
            }
        }
        Some(status)
    }

    /// Halt every running action and drop the plan; the next tick replans.
    pub fn halt(&mut self, world: &mut WorldState) {
        self.abort(&TickContext::default(), world);
    }

    fn should_replan(&self, world: &WorldState) -> bool {
        if self.cooldown <= 0.0 {
            return true;
        }
        match &self.plan {
            None => !self.waiting,
            Some(plan) => {
                plan.is_empty()
                    || self
                        .goals
                        .iter()
                        .find(|g| g.name() == plan.goal())
                        .map_or(true, |g| g.is_satisfied(world))
            }
        }
    }

    fn replan(&mut self, ctx: &TickContext, world: &mut WorldState) {
        self.halt_active(ctx, world);
        self.cooldown = self.config.replan_interval;

        let Some(goal) = select_goal(&self.goals, world) else {
            trace!("no unsatisfied goal");
            self.plan = None;
            self.waiting = true;
            return;
        };

        let actions: Vec<&dyn Action> = self.actions.iter().map(|s| s.action.as_ref()).collect();
        let search = self.planner.search(&actions, world, goal);
        match &search.plan {
            Some(plan) => debug!(
                goal = goal.name(),
                steps = plan.len(),
                cost = plan.cost(),
                expansions = search.expansions,
                "replanned"
            ),
            None => debug!(
                goal = goal.name(),
                expansions = search.expansions,
                "no plan found"
            ),
        }
        self.waiting = search.plan.is_none();
        self.plan = search.plan;
    }

    fn abort(&mut self, ctx: &TickContext, world: &mut WorldState) {
        self.halt_active(ctx, world);
        self.plan = None;
        self.waiting = false;
    }

    fn halt_active(&mut self, ctx: &TickContext, world: &mut WorldState) {
        for id in std::mem::take(&mut self.active) {
            let slot = &mut self.actions[id.index()];
            let mut cx = ActionCx {
                tick: ctx,
                world: &mut *world,
            };
            slot.lifecycle.halt(slot.action.as_mut(), &mut cx);
        }
    }
}

/// Highest-priority unsatisfied goal; the first registered wins ties.
fn select_goal<'g>(goals: &'g [Goal], world: &WorldState) -> Option<&'g Goal> {
    let mut best: Option<(&Goal, f32)> = None;
    for goal in goals.iter().filter(|g| !g.is_satisfied(world)) {
        let priority = goal.priority(world);
        if best.map_or(true, |(_, p)| priority > p) {
            best = Some((goal, priority));
        }
    }
    best.map(|(goal, _)| goal)
}
