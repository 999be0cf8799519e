use std::fmt;

use crate::world::{Requirement, Requirements, WorldState};

/// How urgent a goal is; re-evaluated every time the agent picks a goal.
pub enum Priority {
    Fixed(f32),
    Dynamic(Box<dyn Fn(&WorldState) -> f32>),
}

impl Priority {
    pub fn evaluate(&self, state: &WorldState) -> f32 {
        match self {
            Priority::Fixed(p) => *p,
            Priority::Dynamic(f) => f(state),
        }
    }
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Fixed(p) => f.debug_tuple("Fixed").field(p).finish(),
            Priority::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A desired world state: either a leaf with requirements or a composite of sub-goals.
///
/// A composite is satisfied when every sub-goal is, and is planned one sub-goal at a time.
#[derive(Debug)]
pub struct Goal {
    name: String,
    requirements: Requirements,
    sub_goals: Vec<Goal>,
    priority: Priority,
}

impl Goal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Requirements::new(),
            sub_goals: Vec::new(),
            priority: Priority::Fixed(1.0),
        }
    }

    pub fn composite(name: impl Into<String>, sub_goals: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            sub_goals: sub_goals.into_iter().collect(),
            ..Self::new(name)
        }
    }

    /// Panics on a composite goal; its requirements are those of its sub-goals.
    pub fn require(mut self, requirement: Requirement) -> Self {
        assert!(
            self.sub_goals.is_empty(),
            "composite goal `{}` cannot carry requirements of its own",
            self.name
        );
        self.requirements.push(requirement);
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Priority::Fixed(priority);
        self
    }

    pub fn with_dynamic_priority(
        mut self,
        priority: impl Fn(&WorldState) -> f32 + 'static,
    ) -> Self {
        self.priority = Priority::Dynamic(Box::new(priority));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn is_composite(&self) -> bool {
        !self.sub_goals.is_empty()
    }

    pub fn priority(&self, state: &WorldState) -> f32 {
        self.priority.evaluate(state)
    }

    pub fn is_satisfied(&self, state: &WorldState) -> bool {
        if self.is_composite() {
            self.sub_goals.iter().all(|g| g.is_satisfied(state))
        } else {
            self.requirements.is_met(state)
        }
    }

    /// Heuristic distance to satisfaction: summed weights of unmet requirements.
    pub fn distance(&self, state: &WorldState) -> f32 {
        if self.is_composite() {
            self.sub_goals.iter().map(|g| g.distance(state)).sum()
        } else {
            self.requirements.distance(state)
        }
    }

    /// The sub-goals of a composite, or the goal itself.
    pub fn decompose(&self) -> Vec<&Goal> {
        if self.is_composite() {
            self.sub_goals.iter().collect()
        } else {
            vec![self]
        }
    }
}
