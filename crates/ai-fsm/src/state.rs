use ai_core::{Blackboard, TickContext};

/// One state of a [`StateMachine`](crate::StateMachine).
pub trait State: 'static {
    fn on_enter(&mut self, _blackboard: &mut Blackboard) {}

    fn update(&mut self, ctx: &TickContext, blackboard: &mut Blackboard);

    fn on_exit(&mut self, _blackboard: &mut Blackboard) {}
}

type Hook = Box<dyn FnMut(&mut Blackboard)>;
type UpdateFn = Box<dyn FnMut(&TickContext, &mut Blackboard)>;

/// A state assembled from closures; every hook is optional.
#[derive(Default)]
pub struct CallbackState {
    enter: Option<Hook>,
    update: Option<UpdateFn>,
    exit: Option<Hook>,
}

impl CallbackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(mut self, f: impl FnMut(&mut Blackboard) + 'static) -> Self {
        self.enter = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&TickContext, &mut Blackboard) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl FnMut(&mut Blackboard) + 'static) -> Self {
        self.exit = Some(Box::new(f));
        self
    }
}

impl State for CallbackState {
    fn on_enter(&mut self, blackboard: &mut Blackboard) {
        if let Some(f) = self.enter.as_mut() {
            f(blackboard);
        }
    }

    fn update(&mut self, ctx: &TickContext, blackboard: &mut Blackboard) {
        if let Some(f) = self.update.as_mut() {
            f(ctx, blackboard);
        }
    }

    fn on_exit(&mut self, blackboard: &mut Blackboard) {
        if let Some(f) = self.exit.as_mut() {
            f(blackboard);
        }
    }
}
