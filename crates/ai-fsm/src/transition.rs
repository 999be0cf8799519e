use std::fmt;

use ai_core::Blackboard;

type Guard = Box<dyn Fn(&Blackboard) -> bool>;

/// An edge towards `target`, optionally guarded by a condition over the blackboard.
pub struct Transition {
    target: String,
    priority: i32,
    guard: Option<Guard>,
}

impl Transition {
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            priority: 0,
            guard: None,
        }
    }

    /// Higher priorities are checked first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn when(mut self, guard: impl Fn(&Blackboard) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// A transition without a guard is always satisfied.
    pub fn is_satisfied(&self, blackboard: &Blackboard) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard(blackboard))
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("priority", &self.priority)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Insert keeping the list sorted by descending priority; equal priorities keep insertion order.
pub(crate) fn insert_sorted(list: &mut Vec<Transition>, transition: Transition) {
    let at = list.partition_point(|t| t.priority >= transition.priority);
    list.insert(at, transition);
}
