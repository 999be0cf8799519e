mod support;

use ai_bt::{Condition, IfThenElse, TreeBuilder, WhileDoElse};
use ai_core::{Blackboard, Status};
use support::{entries, frame, log, Scripted};

fn flag(bb: &Blackboard) -> bool {
    bb.get_as::<bool>("flag").unwrap_or(false)
}

#[test]
fn if_then_else_commits_to_the_chosen_branch() {
    let log = log();
    let mut b = TreeBuilder::new();
    let cond = b.add(Condition::new(flag));
    let then = b.add(Scripted::new(
        "then",
        &[Status::Running, Status::Running, Status::Success],
        &log,
    ));
    let otherwise = b.add(Scripted::always("else", Status::Success, &log));
    let root = b.add(IfThenElse::new(vec![cond, then, otherwise]).unwrap());
    let mut tree = b.build(root).unwrap();
    let mut bb = Blackboard::new();
    bb.set("flag", true);

    assert_eq!(tree.tick(&frame(0), &mut bb), Status::Running);
    bb.set("flag", false);
    assert_eq!(tree.tick(&frame(1), &mut bb), Status::Running);
    assert_eq!(tree.tick(&frame(2), &mut bb), Status::Success);
    assert_eq!(entries(&log), vec!["then:tick", "then:tick", "then:tick"]);

    // A fresh run evaluates the condition again.
    assert_eq!(tree.tick(&frame(3), &mut bb), Status::Success);
    assert_eq!(entries(&log).last().map(String::as_str), Some("else:tick"));
}

#[test]
fn if_then_without_else_fails_on_false_condition() {
    let log = log();
    let mut b = TreeBuilder::new();
    let cond = b.add(Condition::new(flag));
    let then = b.add(Scripted::always("then", Status::Success, &log));
    let root = b.add(IfThenElse::new(vec![cond, then]).unwrap());
    let mut tree = b.build(root).unwrap();

    assert_eq!(tree.tick(&frame(0), &mut Blackboard::new()), Status::Failure);
    assert!(entries(&log).is_empty());
}

#[test]
fn while_do_else_halts_the_branch_it_leaves() {
    let log = log();
    let mut b = TreeBuilder::new();
    let cond = b.add(Condition::new(flag));
    let then = b.add(Scripted::always("then", Status::Running, &log));
    let otherwise = b.add(Scripted::always("else", Status::Success, &log));
    let root = b.add(WhileDoElse::new(vec![cond, then, otherwise]).unwrap());
    let mut tree = b.build(root).unwrap();
    let mut bb = Blackboard::new();
    bb.set("flag", true);

    assert_eq!(tree.tick(&frame(0), &mut bb), Status::Running);
    assert_eq!(tree.tick(&frame(1), &mut bb), Status::Running);
    bb.set("flag", false);
    assert_eq!(tree.tick(&frame(2), &mut bb), Status::Success);
    assert_eq!(
        entries(&log),
        vec!["then:tick", "then:tick", "then:halt", "else:tick"]
    );
    assert!(!tree.is_running());
}

#[test]
fn while_do_else_keeps_its_branch_while_the_condition_is_undecided() {
    let log = log();
    let mut b = TreeBuilder::new();
    let cond = b.add(Scripted::new(
        "cond",
        &[Status::Success, Status::Running, Status::Success],
        &log,
    ));
    let then = b.add(Scripted::always("then", Status::Running, &log));
    let root = b.add(WhileDoElse::new(vec![cond, then]).unwrap());
    let mut tree = b.build(root).unwrap();
    let mut bb = Blackboard::new();

    for tick in 0..3 {
        assert_eq!(tree.tick(&frame(tick), &mut bb), Status::Running);
    }
    assert_eq!(
        entries(&log),
        vec!["cond:tick", "then:tick", "cond:tick", "then:tick", "cond:tick", "then:tick"]
    );
    assert!(tree.is_node_running(then));
}
