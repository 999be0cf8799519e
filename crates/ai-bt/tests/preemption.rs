//! Nodes left running by a parent that moved on are halted by the tree itself.

mod support;

use ai_bt::{Condition, Fallback, Node, NodeCx, NodeId, TreeBuilder};
use ai_core::{BbKey, Blackboard, Status};
use support::{entries, frame, log, Scripted};

const BRANCH: BbKey<i64> = BbKey::new("branch");
const STOP: BbKey<bool> = BbKey::new("stop");

/// Ticks the child picked by `branch` and never halts the others.
struct Pick {
    children: Vec<NodeId>,
}

impl Node for Pick {
    fn kind(&self) -> &'static str {
        "Pick"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let index = cx.blackboard.read(BRANCH).unwrap_or(0) as usize;
        cx.tick_child(self.children[index])
    }
}

#[test]
fn switching_branches_halts_the_abandoned_leaf() {
    let log = log();
    let mut b = TreeBuilder::new();
    let left = b.add_named("left", Scripted::always("left", Status::Running, &log));
    let right = b.add_named("right", Scripted::always("right", Status::Running, &log));
    let root = b.add(Pick {
        children: vec![left, right],
    });
    let mut tree = b.build(root).unwrap();
    let mut bb = Blackboard::new();

    tree.tick(&frame(0), &mut bb);
    assert!(tree.is_node_running(left));

    bb.write(BRANCH, 1);
    tree.tick(&frame(1), &mut bb);
    assert!(!tree.is_node_running(left));
    assert!(tree.is_node_running(right));
    assert_eq!(entries(&log), vec!["left:tick", "right:tick", "left:halt"]);

    let active: Vec<_> = tree.active_nodes().collect();
    assert_eq!(active, vec![right, root]);
}

#[test]
fn halting_the_tree_reaches_nested_running_leaf() {
    let log = log();
    let mut b = TreeBuilder::new();
    let stop = b.add(Condition::new(|bb: &Blackboard| bb.read(STOP).unwrap_or(false)));
    let walk = b.add(Scripted::always("walk", Status::Running, &log));
    let fallback = b.add(Fallback::new(vec![stop, walk]));
    let outer = b.add(Pick {
        children: vec![fallback],
    });
    let mut tree = b.build(outer).unwrap();
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(&frame(0), &mut bb), Status::Running);
    tree.halt(&mut bb);
    bb.write(STOP, true);

    assert_eq!(tree.tick(&frame(1), &mut bb), Status::Success);
    assert_eq!(entries(&log), vec!["walk:tick", "walk:halt"]);
    assert!(!tree.is_running());
}

#[test]
fn halting_an_idle_tree_is_a_no_op() {
    let log = log();
    let mut b = TreeBuilder::new();
    let leaf = b.add(Scripted::always("leaf", Status::Success, &log));
    let mut tree = b.build(leaf).unwrap();
    let mut bb = Blackboard::new();

    tree.halt(&mut bb);
    tree.tick(&frame(0), &mut bb);
    tree.halt(&mut bb);
    assert_eq!(entries(&log), vec!["leaf:tick"]);
}
