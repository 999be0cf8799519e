use std::collections::BTreeMap;
use std::fmt;

use ai_core::{Blackboard, TickContext};
use tracing::debug;

use crate::error::{FsmError, Result};
use crate::state::State;
use crate::transition::{insert_sorted, Transition};

/// What caused a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    /// A transition of the current state matched during `update`.
    Update,
    /// An any-state transition matched during `update`.
    Any,
    Event,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cause::Update => "update",
            Cause::Any => "any",
            Cause::Event => "event",
        })
    }
}

type Listener = Box<dyn FnMut(&str, &str, Cause)>;

/// A finite state machine keyed by state name.
///
/// `update` takes the first satisfied transition of the current state (highest priority first,
/// ties in registration order) and falls back to the any-state transitions. `handle_event` instead
/// looks at every satisfied candidate for the event and takes the one with the highest priority;
/// among equal priorities the first registered wins.
pub struct StateMachine {
    states: BTreeMap<String, Box<dyn State>>,
    default: String,
    current: String,
    started: bool,
    transitions: BTreeMap<String, Vec<Transition>>,
    any: Vec<Transition>,
    events: BTreeMap<(String, String), Vec<Transition>>,
    listener: Option<Listener>,
}

impl StateMachine {
    /// A machine whose initial state is `default`.
    pub fn new(default: impl Into<String>, state: impl State) -> Self {
        let default = default.into();
        let mut states: BTreeMap<String, Box<dyn State>> = BTreeMap::new();
        states.insert(default.clone(), Box::new(state));
        Self {
            states,
            current: default.clone(),
            default,
            started: false,
            transitions: BTreeMap::new(),
            any: Vec::new(),
            events: BTreeMap::new(),
            listener: None,
        }
    }

    pub fn add_state(&mut self, id: impl Into<String>, state: impl State) -> Result<()> {
        let id = id.into();
        if self.states.contains_key(&id) {
            return Err(FsmError::DuplicateState(id));
        }
        self.states.insert(id, Box::new(state));
        Ok(())
    }

    pub fn add_transition(
        &mut self,
        from: impl Into<String>,
        transition: Transition,
    ) -> Result<()> {
        let from = from.into();
        self.check_edge(&from, &transition)?;
        insert_sorted(self.transitions.entry(from).or_default(), transition);
        Ok(())
    }

    /// A transition checked from every state, after that state's own transitions.
    pub fn add_any_transition(&mut self, transition: Transition) -> Result<()> {
        self.require_state(transition.target())?;
        insert_sorted(&mut self.any, transition);
        Ok(())
    }

    pub fn add_event_transition(
        &mut self,
        from: impl Into<String>,
        event: impl Into<String>,
        transition: Transition,
    ) -> Result<()> {
        let from = from.into();
        self.check_edge(&from, &transition)?;
        self.events
            .entry((from, event.into()))
            .or_default()
            .push(transition);
        Ok(())
    }

    /// Called with `(from, to, cause)` after every state change.
    pub fn on_transition(&mut self, listener: impl FnMut(&str, &str, Cause) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn current_state(&self) -> &str {
        &self.current
    }

    pub fn default_state(&self) -> &str {
        &self.default
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn has_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Enter the default state. No-op when already started.
    pub fn start(&mut self, blackboard: &mut Blackboard) {
        if self.started {
            return;
        }
        self.started = true;
        self.current = self.default.clone();
        if let Some(state) = self.states.get_mut(&self.current) {
            state.on_enter(blackboard);
        }
    }

    /// Exit the current state. The next `start` (or `update`) begins again from the default state.
    pub fn stop(&mut self, blackboard: &mut Blackboard) {
        if !self.started {
            return;
        }
        if let Some(state) = self.states.get_mut(&self.current) {
            state.on_exit(blackboard);
        }
        self.started = false;
    }

    pub fn update(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        self.start(blackboard);

        let per_state = self
            .transitions
            .get(&self.current)
            .and_then(|list| list.iter().find(|t| t.is_satisfied(blackboard)))
            .map(|t| (t.target().to_owned(), Cause::Update));
        let next = per_state.or_else(|| {
            self.any
                .iter()
                .filter(|t| t.target() != self.current)
                .find(|t| t.is_satisfied(blackboard))
                .map(|t| (t.target().to_owned(), Cause::Any))
        });

        if let Some((target, cause)) = next {
            self.switch_to(target, cause, blackboard);
        }
        if let Some(state) = self.states.get_mut(&self.current) {
            state.update(ctx, blackboard);
        }
    }

    /// Returns whether the event caused a state change.
    pub fn handle_event(&mut self, event: &str, blackboard: &mut Blackboard) -> bool {
        self.start(blackboard);

        let key = (self.current.clone(), event.to_owned());
        let mut best: Option<&Transition> = None;
        for candidate in self.events.get(&key).into_iter().flatten() {
            if !candidate.is_satisfied(blackboard) {
                continue;
            }
            if best.map_or(true, |b| candidate.priority() > b.priority()) {
                best = Some(candidate);
            }
        }

        match best.map(|t| t.target().to_owned()) {
            Some(target) => {
                self.switch_to(target, Cause::Event, blackboard);
                true
            }
            None => false,
        }
    }

    fn switch_to(&mut self, target: String, cause: Cause, blackboard: &mut Blackboard) {
        if let Some(state) = self.states.get_mut(&self.current) {
            state.on_exit(blackboard);
        }
        let from = std::mem::replace(&mut self.current, target);
        debug!(from = %from, to = %self.current, cause = %cause, "fsm state change");
        if let Some(state) = self.states.get_mut(&self.current) {
            state.on_enter(blackboard);
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(&from, &self.current, cause);
        }
    }

    fn require_state(&self, id: &str) -> Result<()> {
        if self.states.contains_key(id) {
            Ok(())
        } else {
            Err(FsmError::UnknownState(id.to_owned()))
        }
    }

    fn check_edge(&self, from: &str, transition: &Transition) -> Result<()> {
        if from == transition.target() {
            return Err(FsmError::SelfTransition(from.to_owned()));
        }
        self.require_state(from)?;
        self.require_state(transition.target())
    }
}
