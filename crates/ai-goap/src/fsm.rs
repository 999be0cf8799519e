//! Connectors between GOAP and state machines.

use ai_core::{Blackboard, Status, TickContext};
use ai_fsm::{State, StateMachine};

use crate::action::{Action, ActionCx, ActionDef};
use crate::world::{Effects, Requirements, WorldState};
use crate::Agent;

/// Runs a state machine as a GOAP action. Always `Running`; a halt stops the machine.
pub struct FsmAction {
    def: ActionDef,
    machine: StateMachine,
}

impl FsmAction {
    pub fn new(def: ActionDef, machine: StateMachine) -> Self {
        Self { def, machine }
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }
}

impl Action for FsmAction {
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
        self.machine.update(cx.tick, cx.world);
        Status::Running
    }

    fn on_halt(&mut self, cx: &mut ActionCx<'_>) {
        self.machine.stop(cx.world);
    }
}

/// A state that drives a GOAP agent while the machine stays in it; leaving halts the agent.
pub struct AgentState {
    agent: Agent,
}

impl AgentState {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}

impl State for AgentState {
    fn update(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        self.agent.tick(ctx, blackboard);
    }

    fn on_exit(&mut self, blackboard: &mut Blackboard) {
        self.agent.halt(blackboard);
    }
}
