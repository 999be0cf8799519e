use std::collections::BTreeMap;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::{FromValue, Result, Value};

/// Typed handle onto a blackboard entry.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Shared key/value data context.
///
/// One tagged-union store: untyped access goes through [`Value`], typed access through
/// [`BbKey`] or [`Blackboard::get_as`]. Clones are deep and equality compares every key and
/// value, which is what GOAP world-state deduplication relies on.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Blackboard {
    values: BTreeMap<String, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Replace the entry under `key` with `f(current)`.
    pub fn update<F>(&mut self, key: &str, f: F)
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let next = f(self.values.get(key));
        self.values.insert(key.to_owned(), next);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn try_get_as<T: FromValue>(&self, key: &str) -> Result<Option<T>> {
        self.values.get(key).map(T::from_value).transpose()
    }

    pub fn get_as<T: FromValue>(&self, key: &str) -> Option<T> {
        self.try_get_as(key).unwrap_or_else(|err| {
            panic!("blackboard type mismatch for key `{key}`: {err}")
        })
    }

    pub fn read<T: FromValue>(&self, key: BbKey<T>) -> Option<T> {
        self.get_as(key.name)
    }

    pub fn write<T: Into<Value>>(&mut self, key: BbKey<T>, value: T) -> Option<Value> {
        self.set(key.name, value)
    }
}

impl<K, V> FromIterator<(K, V)> for Blackboard
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
