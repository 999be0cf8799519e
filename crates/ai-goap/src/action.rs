use std::fmt;

use ai_core::{Hooks, Status, TickContext};

use crate::world::{Effect, Effects, Requirement, Requirements, WorldState};

/// Index of an action inside the [`Agent`](crate::Agent) that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(usize);

impl ActionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an action may touch while it runs.
pub struct ActionCx<'a> {
    pub tick: &'a TickContext,
    pub world: &'a mut WorldState,
}

impl ActionCx<'_> {
    pub fn dt(&self) -> f32 {
        self.tick.dt_seconds
    }
}

/// A GOAP action: a static planning model (requirements, effects, cost) plus the multi-frame
/// execution hooks run once the action is part of a plan.
pub trait Action: 'static {
    fn name(&self) -> &str;

    fn requirements(&self) -> &Requirements;

    fn effects(&self) -> &Effects;

    fn cost(&self, _state: &WorldState) -> f32 {
        1.0
    }

    fn on_start(&mut self, _cx: &mut ActionCx<'_>) -> Status {
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut ActionCx<'_>) -> Status;

    fn on_finish(&mut self, _status: Status, _cx: &mut ActionCx<'_>) {}

    fn on_halt(&mut self, _cx: &mut ActionCx<'_>) {}
}

impl<'a> Hooks<ActionCx<'a>> for dyn Action {
    fn on_start(&mut self, cx: &mut ActionCx<'a>) -> Status {
        Action::on_start(self, cx)
    }

    fn on_tick(&mut self, cx: &mut ActionCx<'a>) -> Status {
        Action::on_tick(self, cx)
    }

    fn on_finish(&mut self, status: Status, cx: &mut ActionCx<'a>) {
        Action::on_finish(self, status, cx)
    }

    fn on_halt(&mut self, cx: &mut ActionCx<'a>) {
        Action::on_halt(self, cx)
    }
}

/// The planning model of an action: name, requirements, effects and cost.
///
/// Embedded by [`SimpleAction`] and the connector actions.
pub struct ActionDef {
    name: String,
    requirements: Requirements,
    effects: Effects,
    cost: f32,
    cost_fn: Option<Box<dyn Fn(&WorldState) -> f32>>,
}

impl ActionDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Requirements::new(),
            effects: Effects::new(),
            cost: 1.0,
            cost_fn: None,
        }
    }

    pub fn require(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self.cost_fn = None;
        self
    }

    /// Cost computed from the state the action would be applied to.
    pub fn with_cost_fn(mut self, cost: impl Fn(&WorldState) -> f32 + 'static) -> Self {
        self.cost_fn = Some(Box::new(cost));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn cost(&self, state: &WorldState) -> f32 {
        match &self.cost_fn {
            Some(f) => f(state),
            None => self.cost,
        }
    }
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("requirements", &self.requirements)
            .field("effects", &self.effects)
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

type TickFn = Box<dyn FnMut(&mut ActionCx<'_>) -> Status>;
type HaltFn = Box<dyn FnMut(&mut ActionCx<'_>)>;

/// An action assembled from an [`ActionDef`] and optional closures.
///
/// Without a tick closure it succeeds on its first tick.
pub struct SimpleAction {
    def: ActionDef,
    start: Option<TickFn>,
    tick: Option<TickFn>,
    halt: Option<HaltFn>,
}

impl SimpleAction {
    pub fn new(def: ActionDef) -> Self {
        Self {
            def,
            start: None,
            tick: None,
            halt: None,
        }
    }

    pub fn on_start(mut self, f: impl FnMut(&mut ActionCx<'_>) -> Status + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_tick(mut self, f: impl FnMut(&mut ActionCx<'_>) -> Status + 'static) -> Self {
        self.tick = Some(Box::new(f));
        self
    }

    pub fn on_halt(mut self, f: impl FnMut(&mut ActionCx<'_>) + 'static) -> Self {
        self.halt = Some(Box::new(f));
        self
    }

    pub fn def(&self) -> &ActionDef {
        &self.def
    }
}

impl From<ActionDef> for SimpleAction {
    fn from(def: ActionDef) -> Self {
        Self::new(def)
    }
}

impl Action for SimpleAction {
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

    fn on_start(&mut self, cx: &mut ActionCx<'_>) -> Status {
        match self.start.as_mut() {
            Some(f) => f(cx),
            None => Status::Running,
        }
    }

    fn on_tick(&mut self, cx: &mut ActionCx<'_>) -> Status {
        match self.tick.as_mut() {
            Some(f) => f(cx),
            None => Status::Success,
        }
    }

    fn on_halt(&mut self, cx: &mut ActionCx<'_>) {
        if let Some(f) = self.halt.as_mut() {
            f(cx);
        }
    }
}
