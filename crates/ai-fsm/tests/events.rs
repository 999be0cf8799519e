use ai_core::{BbKey, Blackboard, TickContext};
use ai_fsm::{CallbackState, StateMachine, Transition};

const ARMED: BbKey<bool> = BbKey::new("armed");

fn machine() -> StateMachine {
    let mut fsm = StateMachine::new("idle", CallbackState::new());
    for id in ["investigate", "attack", "hide"] {
        fsm.add_state(id, CallbackState::new()).unwrap();
    }
    fsm
}

#[test]
fn event_picks_maximum_priority_not_first_registered() {
    let mut fsm = machine();
    fsm.add_event_transition("idle", "noise", Transition::to("investigate"))
        .unwrap();
    fsm.add_event_transition("idle", "noise", Transition::to("hide").with_priority(3))
        .unwrap();
    fsm.add_event_transition(
        "idle",
        "noise",
        Transition::to("attack")
            .with_priority(10)
            .when(|bb| bb.read(ARMED).unwrap_or(false)),
    )
    .unwrap();

    let mut bb = Blackboard::new();
    assert!(fsm.handle_event("noise", &mut bb));
    assert_eq!(fsm.current_state(), "hide");
}

#[test]
fn satisfied_high_priority_candidate_wins() {
    let mut fsm = machine();
    fsm.add_event_transition("idle", "noise", Transition::to("hide").with_priority(3))
        .unwrap();
    fsm.add_event_transition(
        "idle",
        "noise",
        Transition::to("attack")
            .with_priority(10)
            .when(|bb| bb.read(ARMED).unwrap_or(false)),
    )
    .unwrap();

    let mut bb = Blackboard::new();
    bb.write(ARMED, true);
    assert!(fsm.handle_event("noise", &mut bb));
    assert_eq!(fsm.current_state(), "attack");
}

#[test]
fn equal_priorities_keep_the_first_registered() {
    let mut fsm = machine();
    fsm.add_event_transition("idle", "noise", Transition::to("hide").with_priority(1))
        .unwrap();
    fsm.add_event_transition("idle", "noise", Transition::to("attack").with_priority(1))
        .unwrap();

    fsm.handle_event("noise", &mut Blackboard::new());
    assert_eq!(fsm.current_state(), "hide");
}

#[test]
fn events_are_scoped_to_the_current_state() {
    let mut fsm = machine();
    fsm.add_event_transition("attack", "noise", Transition::to("hide"))
        .unwrap();
    let mut bb = Blackboard::new();

    assert!(!fsm.handle_event("noise", &mut bb));
    assert!(!fsm.handle_event("unknown", &mut bb));
    assert_eq!(fsm.current_state(), "idle");
    assert!(fsm.is_started());

    fsm.update(&TickContext::default(), &mut bb);
    assert_eq!(fsm.current_state(), "idle");
}
