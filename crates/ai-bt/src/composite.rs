use ai_core::{Status, Value};

use crate::bt::{Node, NodeCx, NodeId};
use crate::error::{BuildError, Result};

/// Tick `children` from `*index` onward until one reports `Running` or `stop_on`.
///
/// Returns the inverse of `stop_on` when every child finished without hitting it.
fn resume(children: &[NodeId], index: &mut usize, cx: &mut NodeCx<'_>, stop_on: Status) -> Status {
    while *index < children.len() {
        let status = cx.tick_child(children[*index]);
        if status.is_running() || status == stop_on {
            return status;
        }
        *index += 1;
    }
    stop_on.invert()
}

/// Tick every child from the first; the child that decides the result halts all others.
fn react(children: &[NodeId], cx: &mut NodeCx<'_>, stop_on: Status) -> Status {
    for (i, &child) in children.iter().enumerate() {
        let status = cx.tick_child(child);
        if status.is_running() || status == stop_on {
            cx.halt_all_except(children, i);
            return status;
        }
    }
    stop_on.invert()
}

/// Runs children in order, resuming the running child; the first failure fails the sequence.
pub struct Sequence {
    children: Vec<NodeId>,
    index: usize,
}

impl Sequence {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }
}

impl Node for Sequence {
    fn kind(&self) -> &'static str {
        "Sequence"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.index = 0;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        resume(&self.children, &mut self.index, cx, Status::Failure)
    }
}

/// Re-evaluates every child from the first on every tick.
pub struct ReactiveSequence {
    children: Vec<NodeId>,
}

impl ReactiveSequence {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children }
    }
}

impl Node for ReactiveSequence {
    fn kind(&self) -> &'static str {
        "ReactiveSequence"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        react(&self.children, cx, Status::Failure)
    }
}

/// Sequence whose position survives halts and failures; it only rewinds after a full pass.
pub struct MemorySequence {
    children: Vec<NodeId>,
    index: usize,
}

impl MemorySequence {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }

    pub fn resume_index(&self) -> usize {
        self.index
    }
}

impl Node for MemorySequence {
    fn kind(&self) -> &'static str {
        "MemorySequence"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let status = resume(&self.children, &mut self.index, cx, Status::Failure);
        if status == Status::Success {
            self.index = 0;
        }
        status
    }
}

/// Tries children in order until one succeeds.
pub struct Fallback {
    children: Vec<NodeId>,
    index: usize,
}

impl Fallback {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }
}

impl Node for Fallback {
    fn kind(&self) -> &'static str {
        "Fallback"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.index = 0;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        resume(&self.children, &mut self.index, cx, Status::Success)
    }
}

pub struct ReactiveFallback {
    children: Vec<NodeId>,
}

impl ReactiveFallback {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children }
    }
}

impl Node for ReactiveFallback {
    fn kind(&self) -> &'static str {
        "ReactiveFallback"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        react(&self.children, cx, Status::Success)
    }
}

/// Fallback counterpart of [`MemorySequence`]: rewinds only after every child failed.
pub struct MemoryFallback {
    children: Vec<NodeId>,
    index: usize,
}

impl MemoryFallback {
    pub fn new(children: Vec<NodeId>) -> Self {
        Self { children, index: 0 }
    }

    pub fn resume_index(&self) -> usize {
        self.index
    }
}

impl Node for MemoryFallback {
    fn kind(&self) -> &'static str {
        "MemoryFallback"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let status = resume(&self.children, &mut self.index, cx, Status::Success);
        if status == Status::Failure {
            self.index = 0;
        }
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelPolicy {
    /// The first child reaching the status decides.
    One,
    /// Every child has to reach the status in the same tick.
    All,
}

/// Ticks every child each frame, in order, then applies its success and failure policies.
pub struct Parallel {
    children: Vec<NodeId>,
    success: ParallelPolicy,
    failure: ParallelPolicy,
}

impl Parallel {
    pub fn new(children: Vec<NodeId>, success: ParallelPolicy, failure: ParallelPolicy) -> Self {
        Self {
            children,
            success,
            failure,
        }
    }

    fn decide(&self, statuses: &[Status]) -> Option<Status> {
        let reached = |policy: ParallelPolicy, target: Status| match policy {
            ParallelPolicy::One => statuses.contains(&target),
            ParallelPolicy::All => statuses.iter().all(|s| *s == target),
        };

        if reached(self.success, Status::Success) {
            Some(Status::Success)
        } else if reached(self.failure, Status::Failure) {
            Some(Status::Failure)
        } else {
            None
        }
    }
}

impl Node for Parallel {
    fn kind(&self) -> &'static str {
        "Parallel"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let statuses: Vec<Status> = self.children.iter().map(|&c| cx.tick_child(c)).collect();
        match self.decide(&statuses) {
            Some(status) => {
                cx.halt_all(&self.children);
                status
            }
            None => Status::Running,
        }
    }
}

fn check_branches(kind: &str, children: &[NodeId]) -> Result<()> {
    if (2..=3).contains(&children.len()) {
        return Ok(());
    }
    Err(BuildError::ChildCount {
        kind: kind.to_owned(),
        expected: "2 or 3".to_owned(),
        found: children.len(),
    })
}

/// `children[0]` is the condition, `children[1]` the THEN branch, `children[2]` the optional
/// ELSE branch. The chosen branch runs to completion without re-checking the condition.
pub struct IfThenElse {
    children: Vec<NodeId>,
    branch: Option<usize>,
}

impl IfThenElse {
    pub fn new(children: Vec<NodeId>) -> Result<Self> {
        check_branches("IfThenElse", &children)?;
        Ok(Self {
            children,
            branch: None,
        })
    }
}

impl Node for IfThenElse {
    fn kind(&self) -> &'static str {
        "IfThenElse"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.branch = None;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let branch = match self.branch {
            Some(branch) => branch,
            None => match cx.tick_child(self.children[0]) {
                Status::Running => return Status::Running,
                Status::Success => 1,
                Status::Failure if self.children.len() == 3 => 2,
                Status::Failure => return Status::Failure,
            },
        };

        self.branch = Some(branch);
        let status = cx.tick_child(self.children[branch]);
        if status.is_terminal() {
            self.branch = None;
        }
        status
    }
}

/// Like [`IfThenElse`], but the condition is re-checked every tick and a change of branch halts
/// the branch that was running.
pub struct WhileDoElse {
    children: Vec<NodeId>,
    branch: Option<usize>,
}

impl WhileDoElse {
    pub fn new(children: Vec<NodeId>) -> Result<Self> {
        check_branches("WhileDoElse", &children)?;
        Ok(Self {
            children,
            branch: None,
        })
    }
}

impl Node for WhileDoElse {
    fn kind(&self) -> &'static str {
        "WhileDoElse"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.branch = None;
        Status::Running
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let target = match cx.tick_child(self.children[0]) {
            // An undecided condition keeps the committed branch going.
            Status::Running => return self.branch.map_or(Status::Running, |b| self.run(cx, b)),
            Status::Success => Some(1),
            Status::Failure => (self.children.len() == 3).then_some(2),
        };

        if let Some(current) = self.branch {
            if Some(current) != target {
                cx.halt_child(self.children[current]);
                self.branch = None;
            }
        }

        match target {
            Some(target) => self.run(cx, target),
            None => Status::Failure,
        }
    }
}

impl WhileDoElse {
    fn run(&mut self, cx: &mut NodeCx<'_>, branch: usize) -> Status {
        self.branch = Some(branch);
        let status = cx.tick_child(self.children[branch]);
        if status.is_terminal() {
            self.branch = None;
        }
        status
    }
}

/// Picks a child by the blackboard value under `key`, looked up once per run.
pub struct Switch {
    key: String,
    cases: Vec<(Value, NodeId)>,
    default: Option<NodeId>,
    children: Vec<NodeId>,
    selected: Option<NodeId>,
}

impl Switch {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cases: Vec::new(),
            default: None,
            children: Vec::new(),
            selected: None,
        }
    }

    pub fn case(mut self, value: impl Into<Value>, child: NodeId) -> Self {
        self.cases.push((value.into(), child));
        self.children.push(child);
        self
    }

    pub fn with_default(mut self, child: NodeId) -> Self {
        self.default = Some(child);
        self.children.push(child);
        self
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }
}

impl Node for Switch {
    fn kind(&self) -> &'static str {
        "Switch"
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn on_start(&mut self, cx: &mut NodeCx<'_>) -> Status {
        let value = cx.blackboard.get(&self.key);
        self.selected = value
            .and_then(|v| self.cases.iter().find(|(case, _)| case == v))
            .map(|(_, child)| *child)
            .or(self.default);
        match self.selected {
            Some(_) => Status::Running,
            None => Status::Failure,
        }
    }

    fn on_tick(&mut self, cx: &mut NodeCx<'_>) -> Status {
        match self.selected {
            Some(child) => cx.tick_child(child),
            None => Status::Failure,
        }
    }
}
