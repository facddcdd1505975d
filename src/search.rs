//! Generic best-first / blind search over tile sequences
//!
//! One expansion model drives five frontier disciplines. The engine keeps a
//! visited set (states are never re-expanded) and a first-discovery parent
//! map used to rebuild the path once a goal is popped.

use crate::error::Error;
use crate::puzzle::{CostModel, TileSequence};
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    UniformCost,
    Greedy,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::UniformCost,
        Strategy::Greedy,
        Strategy::AStar,
    ];

    /// Short name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "BFS",
            Strategy::DepthFirst => "DFS",
            Strategy::UniformCost => "UCS",
            Strategy::Greedy => "GS",
            Strategy::AStar => "A-star",
        }
    }

    /// Frontier key for a node reached with path cost `path_cost`.
    fn priority(&self, path_cost: u64, state: &TileSequence) -> u64 {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst | Strategy::UniformCost => path_cost,
            Strategy::Greedy => state.heuristic(),
            Strategy::AStar => path_cost + state.heuristic(),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BFS" => Ok(Strategy::BreadthFirst),
            "DFS" => Ok(Strategy::DepthFirst),
            "UCS" => Ok(Strategy::UniformCost),
            "GS" | "GREEDY" => Ok(Strategy::Greedy),
            "A-STAR" | "ASTAR" | "A*" => Ok(Strategy::AStar),
            _ => Err(Error::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional caps that force a run to stop with [`Outcome::Exhausted`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<NonZeroUsize>,
    pub time_limit: Option<Duration>,
}

/// Immutable settings for one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub cost_model: CostModel,
    /// Attach per-step move distances to the reconstructed path.
    pub report_costs: bool,
    pub limits: SearchLimits,
}

impl SearchConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            cost_model: CostModel::Uniform,
            report_costs: false,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    pub fn with_cost_reporting(mut self, report_costs: bool) -> Self {
        self.report_costs = report_costs;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: NonZeroUsize) -> Self {
        self.limits.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.limits.time_limit = Some(time_limit);
        self
    }
}

/// How a node's state was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Start,
    Move { parent: TileSequence, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    /// Frontier key; meaning depends on the strategy.
    pub priority: u64,
    /// Sum of edge costs from the initial state.
    pub path_cost: u64,
    pub state: TileSequence,
    pub origin: Origin,
}

impl SearchNode {
    pub fn root(state: TileSequence) -> Self {
        Self {
            priority: 0,
            path_cost: 0,
            state,
            origin: Origin::Start,
        }
    }

    pub fn move_index(&self) -> Option<usize> {
        match &self.origin {
            Origin::Start => None,
            Origin::Move { index, .. } => Some(*index),
        }
    }

    pub fn parent_state(&self) -> Option<&TileSequence> {
        match &self.origin {
            Origin::Start => None,
            Origin::Move { parent, .. } => Some(parent),
        }
    }

    /// Child nodes in increasing swap index, keyed for `config.strategy`.
    pub fn successors(&self, config: &SearchConfig) -> Vec<SearchNode> {
        self.state
            .successors(config.cost_model)
            .into_iter()
            .map(|successor| {
                let path_cost = self.path_cost + successor.step_cost;
                SearchNode {
                    priority: config.strategy.priority(path_cost, &successor.state),
                    path_cost,
                    state: successor.state,
                    origin: Origin::Move {
                        parent: self.state.clone(),
                        index: successor.index,
                    },
                }
            })
            .collect()
    }
}

/// Parent-map entry: either the initial state or the node that first
/// discovered the key state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    Root,
    Node(SearchNode),
}

struct Prioritized {
    priority: u64,
    sequence: u64,
    node: SearchNode,
}

impl Prioritized {
    fn key(&self) -> (u64, u64) {
        (self.priority, self.sequence)
    }
}

impl PartialEq for Prioritized {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Prioritized {}

impl PartialOrd for Prioritized {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Prioritized {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

enum Frontier {
    Queue(VecDeque<SearchNode>),
    Stack(Vec<SearchNode>),
    Priority {
        heap: BinaryHeap<Reverse<Prioritized>>,
        next_sequence: u64,
    },
}

impl Frontier {
    fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BreadthFirst => Frontier::Queue(VecDeque::new()),
            Strategy::DepthFirst => Frontier::Stack(Vec::new()),
            Strategy::UniformCost | Strategy::Greedy | Strategy::AStar => Frontier::Priority {
                heap: BinaryHeap::new(),
                next_sequence: 0,
            },
        }
    }

    fn push(&mut self, node: SearchNode) {
        match self {
            Frontier::Queue(queue) => queue.push_back(node),
            Frontier::Stack(stack) => stack.push(node),
            Frontier::Priority {
                heap,
                next_sequence,
            } => {
                // Equal priorities pop in insertion order.
                heap.push(Reverse(Prioritized {
                    priority: node.priority,
                    sequence: *next_sequence,
                    node,
                }));
                *next_sequence += 1;
            }
        }
    }

    fn pop(&mut self) -> Option<SearchNode> {
        match self {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Priority { heap, .. } => heap.pop().map(|Reverse(entry)| entry.node),
        }
    }

    fn len(&self) -> usize {
        match self {
            Frontier::Queue(queue) => queue.len(),
            Frontier::Stack(stack) => stack.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes popped and marked visited, the goal included.
    pub expanded: usize,
    /// Successors pushed onto the frontier.
    pub generated: usize,
    /// Popped nodes discarded because their state was already visited.
    pub skipped: usize,
    pub max_frontier: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExhaustReason {
    FrontierEmpty,
    ExpansionLimit { max: usize },
    TimeLimit { limit: Duration },
}

impl fmt::Display for ExhaustReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustReason::FrontierEmpty => write!(f, "every reachable state was explored"),
            ExhaustReason::ExpansionLimit { max } => {
                write!(f, "expansion limit of {} reached", max)
            }
            ExhaustReason::TimeLimit { limit } => {
                write!(f, "time limit of {} ms reached", limit.as_millis())
            }
        }
    }
}

/// One line of a reconstructed solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// 0 for the initial state.
    pub index: usize,
    pub state: TileSequence,
    pub move_index: Option<usize>,
    /// Distance the blank travelled, when cost reporting is enabled.
    pub cost: Option<usize>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.move_index {
            None => write!(f, "Step {}: {}", self.index, self.state)?,
            Some(index) => write!(f, "Step {}: move {} {}", self.index, index, self.state)?,
        }
        if let Some(cost) = self.cost {
            write!(f, " (c={})", cost)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub strategy: Strategy,
    pub steps: Vec<Step>,
    /// Sum of the configured move costs along `steps`.
    pub path_cost: u64,
    pub stats: SearchStats,
}

impl Solution {
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn final_state(&self) -> Option<&TileSequence> {
        self.steps.last().map(|step| &step.state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exhaustion {
    pub strategy: Strategy,
    pub reason: ExhaustReason,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Solved(Solution),
    Exhausted(Exhaustion),
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::Exhausted(_) => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            Outcome::Solved(solution) => &solution.stats,
            Outcome::Exhausted(exhaustion) => &exhaustion.stats,
        }
    }
}

enum Termination {
    Goal(SearchNode),
    Exhausted(ExhaustReason),
}

/// Per-run search state: frontier, visited set and parent map.
pub struct SearchRun<'a> {
    config: &'a SearchConfig,
    frontier: Frontier,
    visited: HashSet<TileSequence>,
    parents: HashMap<TileSequence, ParentLink>,
    stats: SearchStats,
    started: Instant,
}

impl<'a> SearchRun<'a> {
    pub fn new(config: &'a SearchConfig, initial: TileSequence) -> Self {
        let mut frontier = Frontier::for_strategy(config.strategy);
        let mut parents = HashMap::new();

        parents.insert(initial.clone(), ParentLink::Root);
        frontier.push(SearchNode::root(initial));

        Self {
            config,
            stats: SearchStats {
                max_frontier: frontier.len(),
                ..SearchStats::default()
            },
            frontier,
            visited: HashSet::new(),
            parents,
            started: Instant::now(),
        }
    }

    pub fn visited(&self) -> &HashSet<TileSequence> {
        &self.visited
    }

    pub fn parent(&self, state: &TileSequence) -> Option<&ParentLink> {
        self.parents.get(state)
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            elapsed: self.started.elapsed(),
            ..self.stats
        }
    }

    fn search(&mut self) -> Termination {
        let limits = self.config.limits;

        while let Some(node) = self.frontier.pop() {
            if !self.visited.insert(node.state.clone()) {
                self.stats.skipped += 1;
                continue;
            }
            self.stats.expanded += 1;

            if node.state.is_goal() {
                return Termination::Goal(node);
            }

            if let Some(max) = limits.max_expansions.map(NonZeroUsize::get) {
                if self.stats.expanded >= max {
                    return Termination::Exhausted(ExhaustReason::ExpansionLimit { max });
                }
            }
            if let Some(limit) = limits.time_limit {
                if self.started.elapsed() >= limit {
                    return Termination::Exhausted(ExhaustReason::TimeLimit { limit });
                }
            }

            for child in node.successors(self.config) {
                if self.visited.contains(&child.state) {
                    continue;
                }
                // First discovery wins; the frontier itself may hold duplicates.
                self.parents
                    .entry(child.state.clone())
                    .or_insert_with(|| ParentLink::Node(node.clone()));
                self.frontier.push(child);
                self.stats.generated += 1;
            }

            self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
        }

        Termination::Exhausted(ExhaustReason::FrontierEmpty)
    }

    /// Walks the parent map from `goal` back to the root and returns the
    /// steps in start-to-goal order.
    pub fn reconstruct(&self, goal: &SearchNode) -> Vec<Step> {
        let mut chain = vec![goal];
        let mut current = goal;

        while let Some(ParentLink::Node(parent)) = self.parents.get(&current.state) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();

        let mut steps: Vec<Step> = Vec::with_capacity(chain.len());
        for (index, node) in chain.into_iter().enumerate() {
            let previous_blank = steps.last().map(|step| step.state.blank_position());
            let (move_index, cost) = match previous_blank {
                None => (None, None),
                Some(blank) => {
                    let moved = node.move_index().unwrap_or(node.state.blank_position());
                    let cost = self.config.report_costs.then(|| moved.abs_diff(blank));
                    (Some(moved), cost)
                }
            };

            steps.push(Step {
                index,
                state: node.state.clone(),
                move_index,
                cost,
            });
        }
        steps
    }

    /// Cost of a reconstructed path under the run's cost model.
    pub fn path_cost(&self, steps: &[Step]) -> u64 {
        steps
            .windows(2)
            .map(|pair| {
                let (prev, next) = (&pair[0].state, &pair[1].state);
                let distance = next.blank_position().abs_diff(prev.blank_position());
                self.config.cost_model.step_cost(next.len(), distance)
            })
            .sum()
    }
}

/// Runs searches with a fixed configuration.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run(&self, initial: TileSequence) -> Outcome {
        let mut run = SearchRun::new(&self.config, initial);
        let strategy = self.config.strategy;

        match run.search() {
            Termination::Goal(goal) => {
                let steps = run.reconstruct(&goal);
                Outcome::Solved(Solution {
                    strategy,
                    path_cost: run.path_cost(&steps),
                    steps,
                    stats: run.stats(),
                })
            }
            Termination::Exhausted(reason) => Outcome::Exhausted(Exhaustion {
                strategy,
                reason,
                stats: run.stats(),
            }),
        }
    }
}
