//! Node-factory registry and the build entry point used by tree loaders.
//!
//! A loader hands over an already-validated [`TreeSpec`]; the registry maps each node's `kind` to
//! a builder and wires children and switch cases by name.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use ai_core::{Blackboard, Status, TickContext, Value};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bt::{Node, NodeId};
use crate::composite::{
    Fallback, IfThenElse, MemoryFallback, MemorySequence, Parallel, ParallelPolicy,
    ReactiveFallback, ReactiveSequence, Sequence, Switch, WhileDoElse,
};
use crate::decorator::{
    Cooldown, FireAndForget, ForceFailure, ForceSuccess, Inverter, Repeat, RepeatCondition, Retry,
    Timeout,
};
use crate::error::{BuildError, Result};
use crate::leaf::{Action, Callback, Condition, SubTree, Timer, Wait};
use crate::tree::{BehaviorTree, TreeBuilder};

/// One node of a declarative tree definition.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSpec {
    pub name: String,
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: BTreeMap<String, Value>,
    /// Switch case label -> target node name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cases: BTreeMap<String, String>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_case(mut self, label: impl Into<String>, target: impl Into<String>) -> Self {
        self.cases.insert(label.into(), target.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeSpec {
    pub root: String,
    pub nodes: Vec<NodeSpec>,
}

impl TreeSpec {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            nodes: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }
}

/// Inputs handed to a node builder: the already-built children and the node's parameters.
pub struct BuildArgs<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub children: Vec<NodeId>,
    pub cases: Vec<(String, NodeId)>,
    pub params: &'a BTreeMap<String, Value>,
    pub registry: &'a Registry,
}

impl BuildArgs<'_> {
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> BuildError {
        BuildError::InvalidParam {
            node: self.name.to_owned(),
            param: key.to_owned(),
            reason: reason.into(),
        }
    }

    fn missing(&self, key: &str) -> BuildError {
        BuildError::MissingParam {
            node: self.name.to_owned(),
            param: key.to_owned(),
        }
    }

    pub fn f32_param(&self, key: &str) -> Result<Option<f32>> {
        self.param(key)
            .map(|v| {
                v.as_number()
                    .map(|n| n as f32)
                    .ok_or_else(|| {
                        self.invalid(key, format!("expected a number, found {}", v.kind()))
                    })
            })
            .transpose()
    }

    pub fn require_f32(&self, key: &str) -> Result<f32> {
        self.f32_param(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn i64_param(&self, key: &str) -> Result<Option<i64>> {
        self.param(key)
            .map(|v| {
                v.as_int().ok_or_else(|| {
                    self.invalid(key, format!("expected an int, found {}", v.kind()))
                })
            })
            .transpose()
    }

    pub fn bool_param(&self, key: &str) -> Result<Option<bool>> {
        self.param(key)
            .map(|v| {
                v.as_bool().ok_or_else(|| {
                    self.invalid(key, format!("expected a bool, found {}", v.kind()))
                })
            })
            .transpose()
    }

    pub fn str_param(&self, key: &str) -> Result<Option<&str>> {
        self.param(key)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| self.invalid(key, format!("expected text, found {}", v.kind())))
            })
            .transpose()
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str_param(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn expect_children(&self, min: usize, max: usize) -> Result<()> {
        let found = self.children.len();
        if (min..=max).contains(&found) {
            return Ok(());
        }
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        Err(BuildError::ChildCount {
            kind: self.kind.to_owned(),
            expected,
            found,
        })
    }

    pub fn single_child(&self) -> Result<NodeId> {
        self.expect_children(1, 1)?;
        Ok(self.children[0])
    }

    fn status_param(&self, key: &str, default: Status) -> Result<Status> {
        match self.str_param(key)? {
            None => Ok(default),
            Some("success") => Ok(Status::Success),
            Some("failure") => Ok(Status::Failure),
            Some(other) => Err(self.invalid(
                key,
                format!("expected `success` or `failure`, got `{other}`"),
            )),
        }
    }

    fn policy_param(&self, key: &str, default: ParallelPolicy) -> Result<ParallelPolicy> {
        match self.str_param(key)? {
            None => Ok(default),
            Some("one") => Ok(ParallelPolicy::One),
            Some("all") => Ok(ParallelPolicy::All),
            Some(other) => {
                Err(self.invalid(key, format!("expected `one` or `all`, got `{other}`")))
            }
        }
    }

    fn attempts_param(&self) -> Result<i32> {
        let attempts = self.i64_param("max_attempts")?.unwrap_or(0);
        i32::try_from(attempts).map_err(|_| self.invalid("max_attempts", "out of range"))
    }
}

#[derive(Default)]
struct Walk<'s> {
    path: Vec<&'s str>,
    seen: BTreeSet<&'s str>,
}

pub type NodeBuilder = Box<dyn Fn(BuildArgs<'_>) -> Result<Box<dyn Node>>>;

/// Name -> builder table plus named sub-tree definitions.
///
/// Owned by the caller and passed to [`Registry::build`]; there is no process-wide instance.
#[derive(Default)]
pub struct Registry {
    builders: BTreeMap<String, NodeBuilder>,
    trees: BTreeMap<String, TreeSpec>,
    // Sub-trees currently being expanded, to reject self-referencing definitions.
    expanding: RefCell<Vec<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in control, decorator and leaf kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert_builtins();
        registry
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.builders.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }

    pub fn register<F>(&mut self, kind: impl Into<String>, builder: F) -> Result<()>
    where
        F: Fn(BuildArgs<'_>) -> Result<Box<dyn Node>> + 'static,
    {
        let kind = kind.into();
        if self.builders.contains_key(&kind) {
            return Err(BuildError::DuplicateKind(kind));
        }
        self.builders.insert(kind, Box::new(builder));
        Ok(())
    }

    pub fn register_action<F>(&mut self, kind: impl Into<String>, action: F) -> Result<()>
    where
        F: FnMut(&TickContext, &mut Blackboard) -> Status + Clone + 'static,
    {
        self.register(kind, move |args| {
            args.expect_children(0, 0)?;
            Ok(Box::new(Action::new(action.clone())))
        })
    }

    pub fn register_condition<F>(&mut self, kind: impl Into<String>, check: F) -> Result<()>
    where
        F: FnMut(&Blackboard) -> bool + Clone + 'static,
    {
        self.register(kind, move |args| {
            args.expect_children(0, 0)?;
            Ok(Box::new(Condition::new(check.clone())))
        })
    }

    pub fn register_callback<F>(&mut self, kind: impl Into<String>, run: F) -> Result<()>
    where
        F: FnMut(&mut Blackboard) + Clone + 'static,
    {
        self.register(kind, move |args| {
            args.expect_children(0, 0)?;
            Ok(Box::new(Callback::new(run.clone())))
        })
    }

    pub fn register_tree(&mut self, name: impl Into<String>, spec: TreeSpec) -> Result<()> {
        let name = name.into();
        if self.trees.contains_key(&name) {
            return Err(BuildError::DuplicateTree(name));
        }
        self.trees.insert(name, spec);
        Ok(())
    }

    /// Build a fresh instance of the sub-tree registered under `name`.
    pub fn build_named(&self, name: &str) -> Result<BehaviorTree> {
        let spec = self
            .trees
            .get(name)
            .ok_or_else(|| BuildError::UnknownTree(name.to_owned()))?;
        if self.expanding.borrow().iter().any(|n| n == name) {
            return Err(BuildError::Cycle(name.to_owned()));
        }

        self.expanding.borrow_mut().push(name.to_owned());
        let tree = self.build(spec);
        self.expanding.borrow_mut().pop();
        tree
    }

    pub fn build(&self, spec: &TreeSpec) -> Result<BehaviorTree> {
        let mut by_name: BTreeMap<&str, &NodeSpec> = BTreeMap::new();
        for node in &spec.nodes {
            if by_name.insert(node.name.as_str(), node).is_some() {
                return Err(BuildError::DuplicateNode(node.name.clone()));
            }
        }

        let root = by_name
            .get(spec.root.as_str())
            .copied()
            .ok_or_else(|| BuildError::UnknownRoot(spec.root.clone()))?;

        let mut builder = TreeBuilder::new();
        let mut walk = Walk::default();
        let root = self.build_node(root, &by_name, &mut builder, &mut walk)?;
        builder.build(root)
    }

    fn build_node<'s>(
        &self,
        spec: &'s NodeSpec,
        by_name: &BTreeMap<&str, &'s NodeSpec>,
        builder: &mut TreeBuilder,
        walk: &mut Walk<'s>,
    ) -> Result<NodeId> {
        let name = spec.name.as_str();
        if walk.path.contains(&name) {
            return Err(BuildError::Cycle(spec.name.clone()));
        }
        if !walk.seen.insert(name) {
            return Err(BuildError::SharedChild(spec.name.clone()));
        }
        walk.path.push(name);

        let lookup = |target: &str| {
            by_name
                .get(target)
                .copied()
                .ok_or_else(|| BuildError::UnknownNode {
                    parent: spec.name.clone(),
                    child: target.to_owned(),
                })
        };

        let mut children = Vec::with_capacity(spec.children.len());
        for child in &spec.children {
            children.push(self.build_node(lookup(child)?, by_name, builder, walk)?);
        }
        let mut cases = Vec::with_capacity(spec.cases.len());
        for (label, target) in &spec.cases {
            let id = self.build_node(lookup(target)?, by_name, builder, walk)?;
            cases.push((label.clone(), id));
        }

        let make = self
            .builders
            .get(&spec.kind)
            .ok_or_else(|| BuildError::UnknownKind(spec.kind.clone()))?;
        let node = make(BuildArgs {
            name: &spec.name,
            kind: &spec.kind,
            children,
            cases,
            params: &spec.params,
            registry: self,
        })?;

        walk.path.pop();
        Ok(builder.add_boxed(spec.name.clone(), node))
    }

    fn insert(
        &mut self,
        kind: &str,
        builder: impl Fn(BuildArgs<'_>) -> Result<Box<dyn Node>> + 'static,
    ) {
        self.builders.insert(kind.to_owned(), Box::new(builder));
    }

    fn insert_builtins(&mut self) {
        self.insert("Sequence", |args| Ok(Box::new(Sequence::new(args.children))));
        self.insert("ReactiveSequence", |args| {
            Ok(Box::new(ReactiveSequence::new(args.children)))
        });
        self.insert("MemorySequence", |args| {
            Ok(Box::new(MemorySequence::new(args.children)))
        });
        self.insert("Fallback", |args| Ok(Box::new(Fallback::new(args.children))));
        self.insert("ReactiveFallback", |args| {
            Ok(Box::new(ReactiveFallback::new(args.children)))
        });
        self.insert("MemoryFallback", |args| {
            Ok(Box::new(MemoryFallback::new(args.children)))
        });
        self.insert("Parallel", |args| {
            let success = args.policy_param("success", ParallelPolicy::All)?;
            let failure = args.policy_param("failure", ParallelPolicy::One)?;
            Ok(Box::new(Parallel::new(args.children, success, failure)))
        });
        self.insert("IfThenElse", |args| Ok(Box::new(IfThenElse::new(args.children)?)));
        self.insert("WhileDoElse", |args| Ok(Box::new(WhileDoElse::new(args.children)?)));
        self.insert("Switch", build_switch);

        self.insert("Inverter", |args| Ok(Box::new(Inverter::new(args.single_child()?))));
        self.insert("ForceSuccess", |args| {
            Ok(Box::new(ForceSuccess::new(args.single_child()?)))
        });
        self.insert("ForceFailure", |args| {
            Ok(Box::new(ForceFailure::new(args.single_child()?)))
        });
        self.insert("FireAndForget", |args| {
            Ok(Box::new(FireAndForget::new(args.single_child()?)))
        });
        self.insert("Timeout", |args| {
            let child = args.single_child()?;
            let seconds = args.require_f32("seconds")?;
            let on_expire = args.status_param("on_expire", Status::Failure)?;
            Ok(Box::new(Timeout::new(child, seconds).with_expire_status(on_expire)))
        });
        self.insert("RetryUntilSuccess", |args| {
            let child = args.single_child()?;
            Ok(Box::new(Retry::until_success(child, args.attempts_param()?)))
        });
        self.insert("RetryUntilFailure", |args| {
            let child = args.single_child()?;
            Ok(Box::new(Retry::until_failure(child, args.attempts_param()?)))
        });
        self.insert("Repeat", |args| {
            let child = args.single_child()?;
            let count = args.i64_param("count")?.unwrap_or(1);
            let count = u32::try_from(count).map_err(|_| args.invalid("count", "must be >= 0"))?;
            let condition = match args.str_param("condition")? {
                None | Some("always") => RepeatCondition::Always,
                Some("success") => RepeatCondition::OnSuccess,
                Some("failure") => RepeatCondition::OnFailure,
                Some(other) => {
                    return Err(args.invalid(
                        "condition",
                        format!("expected `always`, `success` or `failure`, got `{other}`"),
                    ))
                }
            };
            Ok(Box::new(Repeat::new(child, count, condition)))
        });
        self.insert("Cooldown", |args| {
            let child = args.single_child()?;
            let seconds = args.require_f32("seconds")?;
            let reset = args.bool_param("reset_on_halt")?.unwrap_or(false);
            Ok(Box::new(Cooldown::new(child, seconds).with_reset_on_halt(reset)))
        });

        self.insert("Wait", |args| {
            args.expect_children(0, 0)?;
            Ok(Box::new(Wait::new(args.require_f32("seconds")?)))
        });
        self.insert("Timer", |args| {
            args.expect_children(0, 0)?;
            Ok(Box::new(Timer::new(args.require_str("key")?)))
        });
        self.insert("SubTree", |args| {
            args.expect_children(0, 0)?;
            let tree = args.registry.build_named(args.require_str("tree")?)?;
            Ok(Box::new(SubTree::new(tree)))
        });
    }
}

fn parse_case(args: &BuildArgs<'_>, kind: &str, label: &str) -> Result<Value> {
    let bad = |what: &str| args.invalid("cases", format!("case `{label}` is not a valid {what}"));
    match kind {
        "text" => Ok(Value::Text(label.to_owned())),
        "int" => label.parse::<i64>().map(Value::Int).map_err(|_| bad("int")),
        "float" => label.parse::<f64>().map(Value::Float).map_err(|_| bad("float")),
        "bool" => label.parse::<bool>().map(Value::Bool).map_err(|_| bad("bool")),
        other => Err(args.invalid("type", format!("unsupported case type `{other}`"))),
    }
}

fn build_switch(args: BuildArgs<'_>) -> Result<Box<dyn Node>> {
    args.expect_children(0, 1)?;
    let kind = args.str_param("type")?.unwrap_or("text");
    let mut switch = Switch::new(args.require_str("key")?);
    for (label, target) in &args.cases {
        switch = switch.case(parse_case(&args, kind, label)?, *target);
    }
    if let Some(default) = args.children.first() {
        switch = switch.with_default(*default);
    }
    Ok(Box::new(switch))
}
