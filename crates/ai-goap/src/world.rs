//! Requirements and effects over named world-state values.

use std::collections::BTreeMap;
use std::fmt;

use ai_core::{Blackboard, Value};

/// Planner-visible facts. Equality is by value, which is how the planner deduplicates states.
pub type WorldState = Blackboard;

type Check = Box<dyn Fn(Option<&Value>) -> bool>;
type Transform = Box<dyn Fn(Option<&Value>) -> Value>;

fn number(key: &str, value: &Value) -> f64 {
    value.as_number().unwrap_or_else(|| {
        panic!(
            "world value `{key}` is {}, expected a number",
            value.kind()
        )
    })
}

/// A predicate over one named world-state value.
pub struct Requirement {
    key: String,
    weight: f32,
    check: Check,
}

impl Requirement {
    /// `check` receives `None` when the key is absent.
    pub fn from_fn(
        key: impl Into<String>,
        check: impl Fn(Option<&Value>) -> bool + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            weight: 1.0,
            check: Box::new(check),
        }
    }

    pub fn equals(key: impl Into<String>, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        Self::from_fn(key, move |v| v == Some(&expected))
    }

    pub fn not_equals(key: impl Into<String>, unexpected: impl Into<Value>) -> Self {
        let unexpected = unexpected.into();
        Self::from_fn(key, move |v| v != Some(&unexpected))
    }

    pub fn present(key: impl Into<String>) -> Self {
        Self::from_fn(key, |v| v.is_some())
    }

    pub fn absent(key: impl Into<String>) -> Self {
        Self::from_fn(key, |v| v.is_none())
    }

    pub fn at_least(key: impl Into<String>, bound: f64) -> Self {
        Self::numeric(key, move |n| n >= bound)
    }

    pub fn at_most(key: impl Into<String>, bound: f64) -> Self {
        Self::numeric(key, move |n| n <= bound)
    }

    pub fn greater_than(key: impl Into<String>, bound: f64) -> Self {
        Self::numeric(key, move |n| n > bound)
    }

    pub fn less_than(key: impl Into<String>, bound: f64) -> Self {
        Self::numeric(key, move |n| n < bound)
    }

    /// Absent values fail; non-numeric values panic.
    fn numeric(key: impl Into<String>, cmp: impl Fn(f64) -> bool + 'static) -> Self {
        let key = key.into();
        let name = key.clone();
        Self::from_fn(key, move |v| v.is_some_and(|v| cmp(number(&name, v))))
    }

    /// Contribution to goal distance while unsatisfied. Defaults to 1.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_met(&self, state: &WorldState) -> bool {
        (self.check)(state.get(&self.key))
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requirement")
            .field("key", &self.key)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Requirements(Vec<Requirement>);

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, requirement: Requirement) -> Self {
        self.0.push(requirement);
        self
    }

    pub fn push(&mut self, requirement: Requirement) {
        self.0.push(requirement);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.0.iter()
    }

    pub fn is_met(&self, state: &WorldState) -> bool {
        self.0.iter().all(|r| r.is_met(state))
    }

    /// Sum of the weights of the requirements `state` does not meet.
    pub fn distance(&self, state: &WorldState) -> f32 {
        self.0
            .iter()
            .filter(|r| !r.is_met(state))
            .map(Requirement::weight)
            .sum()
    }
}

impl FromIterator<Requirement> for Requirements {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A pure transform of one named world-state value.
pub struct Effect {
    key: String,
    transform: Transform,
}

impl Effect {
    /// `transform` receives `None` when the key is absent and returns the new value.
    pub fn from_fn(
        key: impl Into<String>,
        transform: impl Fn(Option<&Value>) -> Value + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            transform: Box::new(transform),
        }
    }

    pub fn set(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::from_fn(key, move |_| value.clone())
    }

    /// Numeric addition. `Int + Int` stays an `Int` and panics on overflow; any float operand
    /// yields a `Float`. A missing value counts as zero.
    pub fn add(key: impl Into<String>, delta: impl Into<Value>) -> Self {
        let key = key.into();
        let name = key.clone();
        let delta = delta.into();
        number(&name, &delta);
        Self::from_fn(key, move |current| match (current, &delta) {
            (None, d) => d.clone(),
            (Some(Value::Int(a)), Value::Int(b)) => match a.checked_add(*b) {
                Some(sum) => Value::Int(sum),
                None => panic!("adding {b} to world value `{name}` ({a}) overflows"),
            },
            (Some(v), d) => Value::Float(number(&name, v) + number(&name, d)),
        })
    }

    /// Flips a bool. A missing value counts as `false`.
    pub fn toggle(key: impl Into<String>) -> Self {
        let key = key.into();
        let name = key.clone();
        Self::from_fn(key, move |current| match current {
            None => Value::Bool(true),
            Some(Value::Bool(b)) => Value::Bool(!b),
            Some(other) => panic!("cannot toggle world value `{name}` of kind {}", other.kind()),
        })
    }

    /// Appends to a list. A missing value counts as the empty list.
    pub fn push(key: impl Into<String>, item: impl Into<Value>) -> Self {
        let key = key.into();
        let name = key.clone();
        let item = item.into();
        Self::from_fn(key, move |current| {
            let mut items = match current {
                None => Vec::new(),
                Some(Value::List(items)) => items.clone(),
                Some(other) => {
                    panic!("cannot push onto world value `{name}` of kind {}", other.kind())
                }
            };
            items.push(item.clone());
            Value::List(items)
        })
    }

    /// Applies `effects` to the entries of a map value. A missing value counts as the empty map.
    pub fn nested(key: impl Into<String>, effects: Effects) -> Self {
        let key = key.into();
        let name = key.clone();
        Self::from_fn(key, move |current| {
            let mut map = match current {
                None => BTreeMap::new(),
                Some(Value::Map(map)) => map.clone(),
                Some(other) => panic!(
                    "cannot apply nested effects to world value `{name}` of kind {}",
                    other.kind()
                ),
            };
            for effect in effects.iter() {
                let next = (effect.transform)(map.get(&effect.key));
                map.insert(effect.key.clone(), next);
            }
            Value::Map(map)
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn apply(&self, state: &mut WorldState) {
        state.update(&self.key, |current| (self.transform)(current));
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.0.push(effect);
        self
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.iter()
    }

    /// Apply every effect in order, mutating `state` in place.
    pub fn apply(&self, state: &mut WorldState) {
        for effect in &self.0 {
            effect.apply(state);
        }
    }
}

impl FromIterator<Effect> for Effects {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
