//! Monte Carlo tree search with UCT selection and uniformly random rollouts.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by
//! [`NodeId`], so the parent links used by backpropagation never form
//! ownership cycles. The tree is dropped when [`search`] returns.
//!
//! Rollout results are the raw [`GameState::evaluate`] score (X-positive)
//! and are added to every ancestor unchanged: the sign is not flipped per
//! ply. Selection therefore favours X-friendly lines at every level.

use log::{debug, error};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

use crate::board::{GameState, Move};

pub const C_UCT: f64 = 1.41;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize { self.0 as usize }
}

#[derive(Debug, Clone, Copy)]
pub struct MctsParams {
    pub iterations: u32,
    pub time_limit: Option<Duration>,
    pub exploration: f64,
}

impl Default for MctsParams {
    fn default() -> Self {
        Self { iterations: 1000, time_limit: None, exploration: C_UCT }
    }
}

/// A node in the MCTS tree
#[derive(Debug, Clone)]
pub struct Node {
    state: GameState,
    parent: Option<NodeId>,
    mv: Option<Move>,
    visits: u32,
    score: i64,
    children: Vec<NodeId>,
    untried: Vec<Move>,
}

impl Node {
    fn new(state: GameState, parent: Option<NodeId>, mv: Option<Move>) -> Self {
        let untried = state.valid_moves();
        Self { state, parent, mv, visits: 0, score: 0, children: Vec::new(), untried }
    }

    pub fn state(&self) -> &GameState { &self.state }
    pub fn parent(&self) -> Option<NodeId> { self.parent }
    pub fn get_move(&self) -> Option<Move> { self.mv }
    pub fn visits(&self) -> u32 { self.visits }
    pub fn score(&self) -> i64 { self.score }
    pub fn children(&self) -> &[NodeId] { &self.children }
    pub fn untried(&self) -> &[Move] { &self.untried }

    /// Average rollout score
    pub fn get_q(&self) -> f64 {
        if self.visits == 0 { 0.0 } else { self.score as f64 / self.visits as f64 }
    }

    pub fn is_fully_expanded(&self) -> bool { self.untried.is_empty() }
}

/// UCT value of a child; unvisited children rank above everything else.
fn calc_uct(child: &Node, parent_visits: u32, c: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let n = child.visits as f64;
    child.score as f64 / n + c * ((parent_visits as f64).ln() / n).sqrt()
}

#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}

/// Arena-backed search tree; the root is always `NodeId(0)`.
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<Node>,
}

impl MctsTree {
    pub fn new(root_state: GameState) -> Self {
        Self { nodes: vec![Node::new(root_state, None, None)] }
    }

    pub fn root(&self) -> NodeId { NodeId(0) }

    pub fn get(&self, id: NodeId) -> &Node { &self.nodes[id.index()] }

    fn get_mut(&mut self, id: NodeId) -> &mut Node { &mut self.nodes[id.index()] }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Child with the greatest UCT value; the first one wins ties.
    pub fn select_child(&self, id: NodeId, c: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;
        for &child in &node.children {
            let uct = calc_uct(self.get(child), node.visits, c);
            if best.map_or(true, |(_, b)| uct > b) { best = Some((child, uct)); }
        }
        best.map(|(child, _)| child)
    }

    /// Pops the last untried move of `id` and attaches the resulting child.
    pub fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let mv = self.get_mut(id).untried.pop()?;
        let mut state = self.get(id).state.clone();
        if let Err(e) = state.play(mv) {
            error!("untried move {} rejected: {}", mv, e);
            return None;
        }
        let child = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(state, Some(id), Some(mv)));
        self.get_mut(id).children.push(child);
        Some(child)
    }

    /// Adds one visit and `result` to every node from `leaf` up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, result: i32) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.score += result as i64;
            current = node.parent;
        }
    }

    /// Most visited root child; the first one wins ties.
    pub fn best_child(&self) -> Option<NodeId> {
        let root = self.get(self.root());
        let mut best: Option<(NodeId, u32)> = None;
        for &child in &root.children {
            let v = self.get(child).visits;
            if best.map_or(true, |(_, b)| v > b) { best = Some((child, v)); }
        }
        best.map(|(child, _)| child)
    }

    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root());
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_value: root.get_q(),
            max_depth: self.max_depth(self.root(), 0),
        }
    }

    fn max_depth(&self, id: NodeId, depth: u32) -> u32 {
        self.get(id).children.iter().map(|&c| self.max_depth(c, depth + 1)).max().unwrap_or(depth)
    }

    /// Table of the most visited root children, for debug output.
    pub fn statistics_string(&self, c: f64) -> String {
        let mut s = String::from("|   move   |     N     |     Q     |    UCT    |\n");
        let root = self.get(self.root());
        let mut sorted: Vec<NodeId> = root.children.clone();
        sorted.sort_by(|a, b| self.get(*b).visits.cmp(&self.get(*a).visits));
        for id in sorted.iter().take(10) {
            let child = self.get(*id);
            let mv = child.mv.map(|m| m.to_string()).unwrap_or_default();
            s.push_str(&format!(
                "|{:^10}|{:^11}|{:^11.4}|{:^11.4}|\n",
                mv, child.visits, child.get_q(), calc_uct(child, root.visits, c)
            ));
        }
        s
    }
}

/// Plays uniformly random legal moves from `state` to the end and scores the final position.
pub fn rollout<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> i32 {
    let mut game = state.clone();
    while !game.is_terminal() {
        let moves = game.valid_moves();
        let Some(&mv) = moves.choose(rng) else {
            error!("no legal moves in a live position during rollout:\n{}", game);
            debug_assert!(false, "live position without legal moves");
            break;
        };
        if let Err(e) = game.play(mv) {
            error!("rollout move {} rejected: {}", mv, e);
            break;
        }
    }
    game.evaluate()
}

#[derive(Debug, Clone, Default)]
pub struct MctsResult {
    pub best_move: Option<Move>,
    pub iterations: u32,
    pub nodes: usize,
    pub root_visits: u32,
    pub elapsed: Duration,
}

/// Runs up to `params.iterations` iterations, stopping early once the time limit passes.
/// A limit too large to represent as an `Instant` is treated as no limit.
///
/// Returns no move for a terminal root or when no iteration ran.
pub fn search<R: Rng + ?Sized>(state: &GameState, params: MctsParams, rng: &mut R) -> MctsResult {
    let start = Instant::now();
    if state.is_terminal() {
        return MctsResult { elapsed: start.elapsed(), ..MctsResult::default() };
    }
    // A limit past the end of the clock's range means no deadline.
    let deadline = params.time_limit.and_then(|d| start.checked_add(d));
    let mut tree = MctsTree::new(state.clone());
    let mut iterations = 0u32;

    for _ in 0..params.iterations {
        if let Some(dl) = deadline { if Instant::now() >= dl { break; } }

        let mut node = tree.root();
        while tree.get(node).is_fully_expanded() {
            match tree.select_child(node, params.exploration) {
                Some(child) => node = child,
                None => break,
            }
        }
        if !tree.get(node).is_fully_expanded() {
            if let Some(child) = tree.expand(node) { node = child; }
        }
        let result = rollout(tree.get(node).state(), rng);
        tree.backpropagate(node, result);
        iterations += 1;
    }

    let best_move = tree.best_child().and_then(|id| tree.get(id).get_move());
    let stats = tree.stats();
    debug!(
        "mcts: {} iterations, {} nodes, max depth {}, root q {:.3}, best {:?}",
        iterations, stats.total_nodes, stats.max_depth, stats.root_value, best_move.map(|m| m.to_string())
    );
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("\n{}", tree.statistics_string(params.exploration));
    }
    MctsResult { best_move, iterations, nodes: stats.total_nodes, root_visits: stats.root_visits, elapsed: start.elapsed() }
}
