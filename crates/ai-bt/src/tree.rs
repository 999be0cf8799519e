use std::collections::BTreeSet;
use std::fmt;

use ai_core::{Blackboard, Status, TickContext};
use tracing::trace;

use crate::bt::{halt_node, tick_node, Node, NodeId, Slot};
use crate::error::{BuildError, Result};

/// Collects nodes into an arena; children must be added before the parents that reference them.
#[derive(Default)]
pub struct TreeBuilder {
    slots: Vec<Slot>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn add(&mut self, node: impl Node) -> NodeId {
        let name = node.kind().to_owned();
        self.add_boxed(name, Box::new(node))
    }

    pub fn add_named(&mut self, name: impl Into<String>, node: impl Node) -> NodeId {
        self.add_boxed(name, Box::new(node))
    }

    pub fn add_boxed(&mut self, name: impl Into<String>, node: Box<dyn Node>) -> NodeId {
        let id = NodeId::new(self.slots.len());
        self.slots.push(Slot::new(name.into(), node));
        id
    }

    /// Validate child references and produce a runnable tree rooted at `root`.
    pub fn build(self, root: NodeId) -> Result<BehaviorTree> {
        let len = self.slots.len();
        if root.index() >= len {
            return Err(BuildError::UnknownNodeId(root.index()));
        }

        let mut has_parent = vec![false; len];
        for slot in &self.slots {
            let Some(node) = slot.node.as_ref() else {
                continue;
            };
            for child in node.children() {
                let index = child.index();
                if index >= len {
                    return Err(BuildError::UnknownNodeId(index));
                }
                if has_parent[index] || *child == root {
                    return Err(BuildError::SharedChild(self.slots[index].name.clone()));
                }
                has_parent[index] = true;
            }
        }

        Ok(BehaviorTree {
            slots: self.slots,
            root,
            active: BTreeSet::new(),
            last: None,
        })
    }
}

/// A runnable behavior tree.
///
/// Each tick collects the set of nodes that reported `Running`. Nodes that were running after the
/// previous tick but were not reached this time (e.g. the losing branch of a fallback) are halted
/// once the root returns.
pub struct BehaviorTree {
    slots: Vec<Slot>,
    root: NodeId,
    active: BTreeSet<NodeId>,
    last: Option<Status>,
}

impl BehaviorTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.slots.get(id.index()).map(|s| s.name.as_str())
    }

    /// First node registered under `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.slots
            .iter()
            .position(|s| s.name == name)
            .map(NodeId::new)
    }

    pub fn is_running(&self) -> bool {
        self.is_node_running(self.root)
    }

    pub fn is_node_running(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|s| s.lifecycle.is_running())
    }

    /// Nodes that reported `Running` during the last tick.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.active.iter().copied()
    }

    pub fn last_status(&self) -> Option<Status> {
        self.last
    }

    pub fn tick(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) -> Status {
        let mut active = BTreeSet::new();
        let status = tick_node(&mut self.slots, self.root, ctx, blackboard, &mut active);

        let previous = std::mem::take(&mut self.active);
        let abandoned: Vec<NodeId> = previous.difference(&active).copied().collect();
        for id in abandoned {
            let name = &self.slots[id.index()].name;
            trace!(node = %id, name = %name, "node abandoned since previous tick");
            halt_node(&mut self.slots, id, ctx, blackboard, &mut active);
        }

        self.active = active;
        self.last = Some(status);
        status
    }

    /// Halt the whole tree; the next tick starts a fresh run from the root.
    pub fn halt(&mut self, blackboard: &mut Blackboard) {
        let ctx = TickContext::default();
        let mut scratch = BTreeSet::new();
        halt_node(&mut self.slots, self.root, &ctx, blackboard, &mut scratch);
        let leftover = std::mem::take(&mut self.active);
        for id in leftover {
            halt_node(&mut self.slots, id, &ctx, blackboard, &mut scratch);
        }
    }
}

impl fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("root", &self.root)
            .field("len", &self.slots.len())
            .field("active", &self.active)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
