use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{Action, ActionId};
use crate::goal::Goal;
use crate::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Dequeued nodes per leaf goal before the search gives up.
    pub max_iterations: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}

/// An ordered list of actions expected to satisfy `goal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    goal: String,
    steps: VecDeque<ActionId>,
    cost: f32,
}

impl Plan {
    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn next(&self) -> Option<ActionId> {
        self.steps.front().copied()
    }

    pub fn steps(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().copied()
    }

    pub(crate) fn advance(&mut self) -> Option<ActionId> {
        self.steps.pop_front()
    }
}

/// Outcome of one planning call.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub plan: Option<Plan>,
    /// Nodes dequeued and expanded across every leaf search.
    pub expansions: usize,
}

struct SearchNode {
    state: WorldState,
    g: f32,
    h: f32,
    parent: Option<(usize, ActionId)>,
    // Insertion order, used to break f-cost ties.
    seq: usize,
}

impl SearchNode {
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

struct LeafResult {
    steps: Vec<ActionId>,
    cost: f32,
    end: WorldState,
}

/// A* over world states.
///
/// Open and closed sets compare states by value; a state reached again through the open set only
/// replaces the queued node when its f-cost is strictly lower.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }

    pub fn plan(&self, actions: &[&dyn Action], state: &WorldState, goal: &Goal) -> Option<Plan> {
        self.search(actions, state, goal).plan
    }

    /// Plan for `goal`. Composite goals are planned sub-goal by sub-goal against a working state
    /// advanced by each sub-plan's effects; any failing sub-goal fails the whole plan.
    pub fn search(&self, actions: &[&dyn Action], state: &WorldState, goal: &Goal) -> Search {
        let mut expansions = 0;
        let mut working = state.clone();
        let mut steps = VecDeque::new();
        let mut cost = 0.0;

        for sub_goal in goal.decompose() {
            let found = if sub_goal.is_composite() {
                let nested = self.search(actions, &working, sub_goal);
                expansions += nested.expansions;
                nested.plan.map(|plan| {
                    let end = replay(actions, &working, plan.steps());
                    LeafResult {
                        steps: plan.steps.into(),
                        cost: plan.cost,
                        end,
                    }
                })
            } else {
                self.search_leaf(actions, &working, sub_goal, &mut expansions)
            };

            let Some(found) = found else {
                return Search {
                    plan: None,
                    expansions,
                };
            };
            steps.extend(found.steps);
            cost += found.cost;
            working = found.end;
        }

        Search {
            plan: Some(Plan {
                goal: goal.name().to_owned(),
                steps,
                cost,
            }),
            expansions,
        }
    }

    fn search_leaf(
        &self,
        actions: &[&dyn Action],
        start: &WorldState,
        goal: &Goal,
        expansions: &mut usize,
    ) -> Option<LeafResult> {
        if goal.is_satisfied(start) {
            return Some(LeafResult {
                steps: Vec::new(),
                cost: 0.0,
                end: start.clone(),
            });
        }

        let mut nodes = vec![SearchNode {
            state: start.clone(),
            g: 0.0,
            h: goal.distance(start),
            parent: None,
            seq: 0,
        }];
        let mut open: Vec<usize> = vec![0];
        let mut closed: Vec<usize> = Vec::new();
        let mut iterations = 0;

        while let Some(pos) = cheapest(&nodes, &open) {
            if iterations >= self.config.max_iterations {
                debug!(
                    goal = goal.name(),
                    max_iterations = self.config.max_iterations,
                    "planner iteration cap reached"
                );
                return None;
            }
            iterations += 1;

            let current = open.swap_remove(pos);
            if goal.is_satisfied(&nodes[current].state) {
                return Some(reconstruct(nodes, current));
            }
            closed.push(current);
            *expansions += 1;

            for (index, action) in actions.iter().enumerate() {
                let parent = &nodes[current];
                if !action.requirements().is_met(&parent.state) {
                    continue;
                }
                let mut next = parent.state.clone();
                action.effects().apply(&mut next);
                let g = parent.g + action.cost(&parent.state);

                if closed.iter().any(|&c| nodes[c].state == next) {
                    continue;
                }

                let h = goal.distance(&next);
                let edge = Some((current, ActionId::new(index)));
                if let Some(&queued) = open.iter().find(|&&o| nodes[o].state == next) {
                    let node = &mut nodes[queued];
                    if g + h < node.f() {
                        node.g = g;
                        node.parent = edge;
                    }
                    continue;
                }

                let seq = nodes.len();
                nodes.push(SearchNode {
                    state: next,
                    g,
                    h,
                    parent: edge,
                    seq,
                });
                open.push(seq);
            }
        }

        None
    }
}

fn cheapest(nodes: &[SearchNode], open: &[usize]) -> Option<usize> {
    open.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let (a, b) = (&nodes[**a], &nodes[**b]);
            a.f().total_cmp(&b.f()).then(a.seq.cmp(&b.seq))
        })
        .map(|(pos, _)| pos)
}

fn reconstruct(mut nodes: Vec<SearchNode>, goal: usize) -> LeafResult {
    let cost = nodes[goal].g;
    let mut steps = Vec::new();
    let mut cursor = goal;
    while let Some((parent, action)) = nodes[cursor].parent {
        steps.push(action);
        cursor = parent;
    }
    steps.reverse();
    LeafResult {
        steps,
        cost,
        end: nodes.swap_remove(goal).state,
    }
}

fn replay(
    actions: &[&dyn Action],
    state: &WorldState,
    steps: impl Iterator<Item = ActionId>,
) -> WorldState {
    let mut state = state.clone();
    for id in steps {
        actions[id.index()].effects().apply(&mut state);
    }
    state
}
