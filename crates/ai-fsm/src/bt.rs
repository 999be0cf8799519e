//! Connectors between state machines and behavior trees.

use ai_bt::{BehaviorTree, Node, NodeCx};
use ai_core::{Blackboard, Status, TickContext};

use crate::{State, StateMachine};

/// Runs a [`StateMachine`] as a behavior tree leaf.
///
/// The leaf never finishes on its own; halting it stops the machine.
pub struct FsmNode {
    machine: StateMachine,
}

impl FsmNode {
    pub fn new(machine: StateMachine) -> Self {
        Self { machine }
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine {
        &mut self.machine
    }
}

impl Node for FsmNode {
    fn kind(&self) -> &'static str {
        "Fsm"
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        self.machine.update(cx.tick, cx.blackboard);
        Status::Running
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        self.machine.stop(cx.blackboard);
    }
}

/// A state that ticks a behavior tree for as long as the machine stays in it.
///
/// Leaving the state halts the tree.
pub struct TreeState {
    tree: BehaviorTree,
}

impl TreeState {
    pub fn new(tree: BehaviorTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &BehaviorTree {
        &self.tree
    }
}

impl State for TreeState {
    fn update(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        self.tree.tick(ctx, blackboard);
    }

    fn on_exit(&mut self, blackboard: &mut Blackboard) {
        self.tree.halt(blackboard);
    }
}
