use crate::evaluation::{heuristic_score, move_order_score, MAX_HEURISTIC, WIN_SCORE};
use crate::transposition::{NodeType, TranspositionTable};
use battle_core::{generate_legal_moves, BattleState, Move, Outcome, Role};
use std::time::{Duration, Instant};

const INFINITY: i32 = 1_000_000;
const MAX_DEPTH: u8 = 64;
const TIME_CHECK_INTERVAL: u64 = 1000; // Check time every 1000 nodes
const MIN_MOVE_TIME: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u8,
    pub nodes: u64,
    pub stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProgress {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub time_ms: u64,
}

pub type InfoCallback = Box<dyn Fn(&SearchProgress) + Send>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: Option<u8>,
    pub move_time: Option<Duration>,
    pub nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn move_time(millis: u64) -> Self {
        Self {
            move_time: Some(Duration::from_millis(millis)),
            ..Self::default()
        }
    }

    /// Budget for one move under the host's play clock, keeping `margin`
    /// in reserve for the round trip.
    pub fn from_play_clock(play_clock: Duration, margin: Duration) -> Self {
        Self {
            move_time: Some(play_clock.saturating_sub(margin).max(MIN_MOVE_TIME)),
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, depth: Option<u8>) -> Self {
        self.max_depth = depth;
        self
    }
}

struct SearchInfo<'a> {
    start_time: Instant,
    limits: SearchLimits,
    nodes: u64,
    stopped: bool,
    info_callback: Option<&'a dyn Fn(&SearchProgress)>,
    tt: &'a TranspositionTable,
}

impl<'a> SearchInfo<'a> {
    fn new(
        limits: SearchLimits,
        tt: &'a TranspositionTable,
        info_callback: Option<&'a dyn Fn(&SearchProgress)>,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            limits,
            nodes: 0,
            stopped: false,
            info_callback,
            tt,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        // Check node limit
        if let Some(max_nodes) = self.limits.nodes {
            if self.nodes >= max_nodes {
                self.stopped = true;
                return true;
            }
        }

        // Check time limit periodically
        if self.nodes % TIME_CHECK_INTERVAL == 0 {
            return self.deadline_passed();
        }

        false
    }

    fn deadline_passed(&mut self) -> bool {
        if let Some(move_time) = self.limits.move_time {
            if self.start_time.elapsed() >= move_time {
                self.stopped = true;
            }
        }
        self.stopped
    }
}

pub fn search(state: &BattleState, depth: u8) -> SearchResult {
    search_with_limits(state, SearchLimits::depth(depth))
}

pub fn search_with_limits(state: &BattleState, limits: SearchLimits) -> SearchResult {
    let tt = TranspositionTable::new(16); // 16 MB default
    search_with_table(state, limits, &tt, None)
}

pub fn search_with_callback(
    state: &BattleState,
    limits: SearchLimits,
    callback: InfoCallback,
) -> SearchResult {
    let tt = TranspositionTable::new(16);
    search_with_table(state, limits, &tt, Some(&*callback))
}

/// Searches for the side to move using a caller-owned table, so entries
/// survive from one move to the next.
pub fn search_with_table(
    state: &BattleState,
    limits: SearchLimits,
    tt: &TranspositionTable,
    callback: Option<&dyn Fn(&SearchProgress)>,
) -> SearchResult {
    let mut info = SearchInfo::new(limits, tt, callback);
    let mut scratch = state.clone();
    let mut result = iterative_deepening(&mut scratch, &mut info);

    // Never come back empty-handed while a legal move exists
    if result.best_move.is_none() {
        let mut moves = generate_legal_moves(state);
        order_moves(state, &mut moves, None);
        result.best_move = moves.first().copied();
    }

    result
}

fn terminal_score(outcome: Outcome, side_to_move: Role, ply: u8) -> i32 {
    match outcome {
        Outcome::Draw => 0,
        // Prefer quick wins and slow losses
        Outcome::Win(winner) if winner == side_to_move => WIN_SCORE - i32::from(ply),
        Outcome::Win(_) => -(WIN_SCORE - i32::from(ply)),
    }
}

/// Static score for the side to move at a leaf.
fn leaf_score(state: &BattleState) -> i32 {
    let score = heuristic_score(state);
    match state.side_to_move() {
        Role::White => score,
        Role::Black => -score,
    }
}

fn alpha_beta_root(
    state: &mut BattleState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    info: &mut SearchInfo,
) -> (i32, Option<Move>, Vec<Move>) {
    let role = state.side_to_move();
    if let Some(outcome) = state.outcome() {
        return (terminal_score(outcome, role, 0), None, vec![]);
    }

    let tt_move = info.tt.probe(state.hash()).and_then(|e| e.best_move);
    let mut moves = generate_legal_moves(state);
    order_moves(state, &mut moves, tt_move);

    let mut best_move = None;
    let mut best_score = -INFINITY;
    let mut best_pv = vec![];

    for mv in moves {
        if info.deadline_passed() {
            break;
        }

        state.apply_move(mv, role);
        let (score, _, mut pv) = alpha_beta(state, depth - 1, -beta, -alpha, 1, info);
        state.retract_move(mv, role);
        let score = -score;

        if info.stopped {
            break;
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            best_pv = vec![mv];
            best_pv.append(&mut pv);
        }

        if score > alpha {
            alpha = score;
        }

        if alpha >= beta {
            break;
        }
    }

    if best_move.is_some() && !info.stopped {
        info.tt
            .store(state.hash(), best_move, best_score, depth, NodeType::Exact);
    }

    (best_score, best_move, best_pv)
}

fn alpha_beta(
    state: &mut BattleState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: u8,
    info: &mut SearchInfo,
) -> (i32, Option<Move>, Vec<Move>) {
    info.nodes += 1;

    // Check if we should stop searching
    if info.should_stop() {
        return (0, None, vec![]);
    }

    let role = state.side_to_move();
    if let Some(outcome) = state.outcome() {
        return (terminal_score(outcome, role, ply), None, vec![]);
    }

    if depth == 0 {
        return (leaf_score(state), None, vec![]);
    }

    let original_alpha = alpha;
    let hash = state.hash();
    let mut tt_move = None;

    // Probe transposition table
    if let Some(entry) = info.tt.probe(hash) {
        if entry.depth >= depth {
            match entry.node_type {
                NodeType::Exact => {
                    return (entry.score, entry.best_move, entry.best_move.into_iter().collect());
                }
                NodeType::LowerBound => {
                    alpha = alpha.max(entry.score);
                }
                NodeType::UpperBound => {
                    if entry.score <= alpha {
                        return (entry.score, entry.best_move, vec![]);
                    }
                }
            }

            if alpha >= beta {
                return (entry.score, entry.best_move, vec![]);
            }
        }
        // Save the best move from TT for move ordering
        tt_move = entry.best_move;
    }

    let mut moves = generate_legal_moves(state);
    order_moves(state, &mut moves, tt_move);

    let mut best_move = None;
    let mut best_score = -INFINITY;
    let mut best_pv = vec![];

    for mv in moves {
        state.apply_move(mv, role);
        let (score, _, mut pv) = alpha_beta(state, depth - 1, -beta, -alpha, ply + 1, info);
        state.retract_move(mv, role);
        let score = -score;

        // If search was stopped, return current best
        if info.stopped {
            return (best_score, best_move, best_pv);
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            best_pv = vec![mv];
            best_pv.append(&mut pv);
        }

        if score > alpha {
            alpha = score;
        }

        // Beta cutoff
        if alpha >= beta {
            break;
        }
    }

    let node_type = if best_score <= original_alpha {
        NodeType::UpperBound
    } else if best_score >= beta {
        NodeType::LowerBound
    } else {
        NodeType::Exact
    };

    info.tt.store(hash, best_move, best_score, depth, node_type);

    (best_score, best_move, best_pv)
}

/// TT move first, then moves towards the centre.
fn order_moves(state: &BattleState, moves: &mut [Move], tt_move: Option<Move>) {
    moves.sort_by_cached_key(|mv| {
        if tt_move == Some(*mv) {
            return i32::MIN;
        }
        -move_order_score(state, *mv)
    });
}

fn iterative_deepening(state: &mut BattleState, info: &mut SearchInfo) -> SearchResult {
    let mut best_result = SearchResult {
        best_move: None,
        score: 0,
        depth: 0,
        nodes: 0,
        stopped: false,
    };

    let max_depth = info.limits.max_depth.unwrap_or(MAX_DEPTH).clamp(1, MAX_DEPTH);

    for depth in 1..=max_depth {
        let (score, best_move, pv) = alpha_beta_root(state, depth, -INFINITY, INFINITY, info);

        if info.stopped {
            // Keep a partially searched first iteration rather than nothing
            if best_result.best_move.is_none() {
                best_result.best_move = best_move;
                best_result.score = score;
            }
            break;
        }

        if best_move.is_none() {
            // Terminal root or no legal move
            best_result.score = score;
            break;
        }

        best_result.best_move = best_move;
        best_result.score = score;
        best_result.depth = depth;

        if let Some(callback) = info.info_callback {
            let progress = SearchProgress {
                depth,
                score,
                nodes: info.nodes,
                pv,
                time_ms: info.start_time.elapsed().as_millis() as u64,
            };
            callback(&progress);
        }

        // Proven result, or every remaining empty square already searched
        if score.abs() > MAX_HEURISTIC || usize::from(depth) >= state.empty_count() {
            break;
        }
    }

    best_result.nodes = info.nodes;
    best_result.stopped = info.stopped;
    best_result
}
