#![cfg(feature = "bt")]

use std::cell::RefCell;
use std::rc::Rc;

use ai_bt::{Action as BtAction, Sequence, TreeBuilder};
use ai_core::{Blackboard, Status, TickContext};
use ai_goap::bt::{AgentNode, TreeAction};
use ai_goap::{ActionDef, Agent, Effect, Goal, Requirement, SimpleAction};

#[test]
fn tree_action_keeps_running_and_halts_its_tree() {
    let halted = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&halted);

    let mut b = TreeBuilder::new();
    let leaf = b.add(
        BtAction::new(|_ctx, bb: &mut Blackboard| {
            bb.set("patrolled", true);
            Status::Success
        })
        .with_halt(move |_bb| *counter.borrow_mut() += 1),
    );
    let wait = b.add(BtAction::new(|_ctx, _bb| Status::Running).with_halt({
        let counter = Rc::clone(&halted);
        move |_bb| *counter.borrow_mut() += 1
    }));
    let root = b.add(Sequence::new(vec![leaf, wait]));
    let tree = b.build(root).unwrap();

    let mut agent = Agent::new();
    agent
        .add_action(TreeAction::new(
            ActionDef::new("patrol").effect(Effect::set("safe", true)),
            tree,
        ))
        .unwrap();
    agent
        .add_goal(Goal::new("safe").require(Requirement::equals("safe", true)))
        .unwrap();

    let mut world = Blackboard::new();
    for tick in 0..3 {
        assert_eq!(
            agent.tick(&TickContext::new(tick, 0.1), &mut world),
            Some(Status::Running)
        );
    }
    assert!(world.contains("patrolled"));
    assert!(!world.contains("safe"));

    agent.halt(&mut world);
    assert_eq!(*halted.borrow(), 1);
}

#[test]
fn agent_leaf_drives_the_agent_with_the_tree_blackboard() {
    let mut agent = Agent::new();
    agent
        .add_action(SimpleAction::new(
            ActionDef::new("light_fire").effect(Effect::set("warm", true)),
        ))
        .unwrap();
    agent
        .add_goal(Goal::new("warm").require(Requirement::equals("warm", true)))
        .unwrap();

    let mut b = TreeBuilder::new();
    let root = b.add(AgentNode::new(agent));
    let mut tree = b.build(root).unwrap();
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(&TickContext::new(0, 0.1), &mut bb), Status::Running);
    assert!(bb.contains("warm"));

    tree.halt(&mut bb);
    assert!(!tree.is_running());
}
