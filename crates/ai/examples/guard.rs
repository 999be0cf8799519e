//! A guard that patrols with a behavior tree until an alarm goes off, then plans its way through
//! the threat with GOAP before going back to patrolling.
//!
//! Run with `RUST_LOG=debug cargo run -p ai --example guard` to see planner and FSM events.

use ai::bt::{NodeSpec, Registry, TreeSpec};
use ai::fsm::bt::TreeState;
use ai::fsm::{CallbackState, StateMachine, Transition};
use ai::goap::fsm::AgentState;
use ai::goap::{ActionDef, Agent, Effect, Goal, Requirement, SimpleAction};
use ai::{Blackboard, Status, TickContext, Value};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const FRAMES: u64 = 60;
const ALARM_AT: u64 = 12;

fn patrol_tree() -> Result<ai::bt::BehaviorTree> {
    let mut registry = Registry::with_builtins();
    registry.register_callback("NextWaypoint", |bb: &mut Blackboard| {
        bb.update("waypoint", |v| {
            Value::Int(v.and_then(Value::as_int).unwrap_or(0) + 1)
        });
    })?;

    let spec = TreeSpec::new("patrol")
        .with_node(NodeSpec::new("patrol", "Sequence").with_children(["walk", "arrive"]))
        .with_node(NodeSpec::new("walk", "Wait").with_param("seconds", 0.4))
        .with_node(NodeSpec::new("arrive", "NextWaypoint"));
    Ok(registry.build(&spec)?)
}

fn combat_agent() -> Result<Agent> {
    let mut agent = Agent::new();

    agent.add_action(SimpleAction::new(
        ActionDef::new("shoot")
            .require(Requirement::at_least("ammo", 1.0))
            .require(Requirement::at_least("threat", 1.0))
            .effect(Effect::add("ammo", -1))
            .effect(Effect::add("threat", -1)),
    ))?;

    let mut elapsed = 0.0;
    agent.add_action(
        SimpleAction::new(
            ActionDef::new("reload")
                .require(Requirement::less_than("ammo", 1.0))
                .effect(Effect::set("ammo", 2))
                .with_cost(2.0),
        )
        .on_tick(move |cx| {
            elapsed += cx.dt();
            if elapsed < 0.3 {
                return Status::Running;
            }
            elapsed = 0.0;
            Status::Success
        }),
    )?;

    agent.add_goal(Goal::new("clear_threat").require(Requirement::at_most("threat", 0.0)))?;
    Ok(agent)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let mut machine = StateMachine::new("patrol", TreeState::new(patrol_tree()?));
    machine.add_state("combat", AgentState::new(combat_agent()?))?;
    machine.add_state(
        "alert",
        CallbackState::new().on_enter(|bb| {
            bb.set("threat", 3);
        }),
    )?;
    machine.add_event_transition("patrol", "alarm", Transition::to("alert"))?;
    machine.add_transition("alert", Transition::to("combat"))?;
    machine.add_transition(
        "combat",
        Transition::to("patrol").when(|bb| bb.get_as::<i64>("threat").unwrap_or(0) <= 0),
    )?;
    machine.on_transition(|from, to, cause| info!(%from, %to, %cause, "guard state changed"));

    let mut bb: Blackboard = [("waypoint", Value::Int(0)), ("ammo", Value::Int(1))]
        .into_iter()
        .collect();

    let mut ctx = TickContext::new(0, 0.1);
    for _ in 0..FRAMES {
        if ctx.tick == ALARM_AT {
            info!(tick = ctx.tick, "alarm raised");
            machine.handle_event("alarm", &mut bb);
        }
        machine.update(&ctx, &mut bb);
        ctx = ctx.next();
    }

    info!(
        state = machine.current_state(),
        waypoint = bb.get_as::<i64>("waypoint").unwrap_or(0),
        ammo = bb.get_as::<i64>("ammo").unwrap_or(0),
        threat = bb.get_as::<i64>("threat").unwrap_or(0),
        "patrol shift over"
    );
    Ok(())
}
