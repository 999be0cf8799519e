#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ai_bt::{Node, NodeCx};
use ai_core::{Status, TickContext};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub fn frame(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1)
}

/// Leaf that replays a fixed list of statuses and records every hook call as `"<name>:<hook>"`.
///
/// Once the script is exhausted it keeps returning the last entry.
pub struct Scripted {
    name: &'static str,
    script: VecDeque<Status>,
    last: Status,
    log: Log,
}

impl Scripted {
    pub fn new(name: &'static str, script: &[Status], log: &Log) -> Self {
        Self {
            name,
            script: script.iter().copied().collect(),
            last: Status::Running,
            log: Rc::clone(log),
        }
    }

    pub fn always(name: &'static str, status: Status, log: &Log) -> Self {
        Self::new(name, &[status], log)
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{hook}", self.name));
    }
}

impl Node for Scripted {
    fn kind(&self) -> &'static str {
        "Scripted"
    }

    fn on_tick(&mut self, _cx: &mut NodeCx<'_>) -> Status {
        self.record("tick");
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }

    fn on_halt(&mut self, _cx: &mut NodeCx<'_>) {
        self.record("halt");
    }
}
