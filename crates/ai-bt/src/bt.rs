use std::collections::BTreeSet;
use std::fmt;

use ai_core::{Blackboard, Hooks, Lifecycle, Status, TickContext};
use tracing::trace;

/// Index of a node inside the arena of the tree that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A behavior tree node.
///
/// Nodes never call each other directly: children are ticked and halted through the
/// [`NodeCx`] so the arena can apply the execution contract and record the active set.
/// Composites and decorators report their children through [`Node::children`]; the default
/// `on_halt` halts whichever of them are still running.
pub trait Node: 'static {
    fn kind(&self) -> &'static str;

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status;

    fn on_finish(&mut self, _status: Status, _cx: &mut NodeCx<'_>) {}

    fn on_halt(&mut self, cx: &mut NodeCx<'_>) {
        cx.halt_all(self.children());
    }
}

impl<'a> Hooks<NodeCx<'a>> for dyn Node {
    fn on_start(&mut self, cx: &mut NodeCx<'a>) -> Status {
        Node::on_start(self, cx)
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'a>) -> Status {
        Node::on_tick(self, cx)
    }

    fn on_finish(&mut self, status: Status, cx: &mut NodeCx<'a>) {
        Node::on_finish(self, status, cx)
    }

    fn on_halt(&mut self, cx: &mut NodeCx<'a>) {
        Node::on_halt(self, cx)
    }
}

pub(crate) struct Slot {
    pub(crate) name: String,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) node: Option<Box<dyn Node>>,
}

impl Slot {
    pub(crate) fn new(name: String, node: Box<dyn Node>) -> Self {
        Self {
            name,
            lifecycle: Lifecycle::new(),
            node: Some(node),
        }
    }
}

/// Everything a node may touch during one tick or halt.
pub struct NodeCx<'a> {
    pub tick: &'a TickContext,
    pub blackboard: &'a mut Blackboard,
    slots: &'a mut [Slot],
    active: &'a mut BTreeSet<NodeId>,
}

impl<'a> NodeCx<'a> {
    pub fn dt(&self) -> f32 {
        self.tick.dt_seconds
    }

    pub fn tick_child(&mut self, id: NodeId) -> Status {
        tick_node(self.slots, id, self.tick, self.blackboard, self.active)
    }

    pub fn halt_child(&mut self, id: NodeId) {
        halt_node(self.slots, id, self.tick, self.blackboard, self.active);
    }

    pub fn halt_all(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.halt_child(id);
        }
    }

    /// Halt every node in `ids` except the one at position `keep`.
    pub fn halt_all_except(&mut self, ids: &[NodeId], keep: usize) {
        for (i, &id) in ids.iter().enumerate() {
            if i != keep {
                self.halt_child(id);
            }
        }
    }

    pub fn is_running(&self, id: NodeId) -> bool {
        self.slots[id.0].lifecycle.is_running()
    }
}

/// Runs `f` with a context over `slots`, outside of any tree.
#[cfg(test)]
pub(crate) fn with_cx<R>(
    slots: &mut [Slot],
    blackboard: &mut Blackboard,
    f: impl FnOnce(&mut NodeCx<'_>) -> R,
) -> R {
    let tick = TickContext::default();
    let mut active = BTreeSet::new();
    let mut cx = NodeCx {
        tick: &tick,
        blackboard,
        slots,
        active: &mut active,
    };
    f(&mut cx)
}

pub(crate) fn tick_node(
    slots: &mut [Slot],
    id: NodeId,
    tick: &TickContext,
    blackboard: &mut Blackboard,
    active: &mut BTreeSet<NodeId>,
) -> Status {
    let slot = &mut slots[id.0];
    let mut lifecycle = slot.lifecycle;
    let mut node = slot
        .node
        .take()
        .unwrap_or_else(|| panic!("behavior tree node `{}` ({id}) ticked re-entrantly", slot.name));

    let status = {
        let mut cx = NodeCx {
            tick,
            blackboard: &mut *blackboard,
            slots: &mut *slots,
            active: &mut *active,
        };
        lifecycle.tick(&mut *node, &mut cx)
    };

    let slot = &mut slots[id.0];
    slot.lifecycle = lifecycle;
    slot.node = Some(node);

    if status.is_running() {
        active.insert(id);
    } else {
        active.remove(&id);
    }
    status
}

pub(crate) fn halt_node(
    slots: &mut [Slot],
    id: NodeId,
    tick: &TickContext,
    blackboard: &mut Blackboard,
    active: &mut BTreeSet<NodeId>,
) {
    let slot = &mut slots[id.0];
    if !slot.lifecycle.is_running() {
        return;
    }
    // A node halting itself from inside its own callback is a no-op.
    let Some(mut node) = slot.node.take() else {
        return;
    };
    let mut lifecycle = slot.lifecycle;
    trace!(node = %id, name = %slot.name, "halting node");

    {
        let mut cx = NodeCx {
            tick,
            blackboard: &mut *blackboard,
            slots: &mut *slots,
            active: &mut *active,
        };
        lifecycle.halt(&mut *node, &mut cx);
    }

    let slot = &mut slots[id.0];
    slot.lifecycle = lifecycle;
    slot.node = Some(node);
    active.remove(&id);
}
