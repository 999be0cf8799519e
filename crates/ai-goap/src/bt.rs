//! Connectors between GOAP and behavior trees.

use ai_bt::{BehaviorTree, Node, NodeCx};
use ai_core::Status;

use crate::action::{Action, ActionCx, ActionDef};
use crate::world::{Effects, Requirements, WorldState};
use crate::Agent;

/// Runs a behavior tree as a GOAP action.
///
/// The action never finishes on its own: it reports `Running` every tick and relies on the agent
/// halting it (on replan or abort), which halts the tree.
pub struct TreeAction {
    def: ActionDef,
    tree: BehaviorTree,
}

impl TreeAction {
    pub fn new(def: ActionDef, tree: BehaviorTree) -> Self {
        Self { def, tree }
    }

    pub fn tree(&self) -> &BehaviorTree {
        &self.tree
    }
}

impl Action for TreeAction {
    fn name(&self) -> &str {
        self.def.name()
    }

    fn requirements(&self) -> &Requirements {
        self.def.requirements()
    }

    fn effects(&self) -> &Effects {
        self.def.effects()
    }

    fn cost(&self, state: &WorldState) -> f32 {
        self.def.cost(state)
    }

    fn on_tick(&mut self, cx: &mut ActionCx<'_>) -> Status {
        self.tree.tick(cx.tick, cx.world);
        Status::Running
    }

    fn on_halt(&mut self, cx: &mut ActionCx<'_>) {
        self.tree.halt(cx.world);
    }
}

/// Runs a GOAP agent as a behavior tree leaf, with the tree's blackboard as its world state.
///
/// Always `Running`; halting the leaf halts the agent's running actions and drops its plan.
pub struct AgentNode {
    agent: Agent,
}

impl AgentNode {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

impl Node for AgentNode {
    fn kind(&self) -> &'static str {
        "GoapAgent"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.agent.tick(cx.tick, cx.blackboard);
        Status::Running
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        self.agent.halt(cx.blackboard);
    }
}
