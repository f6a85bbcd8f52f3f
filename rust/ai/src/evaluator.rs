//! Move scoring for the heuristic bot.
//!
//! Every sub-score is a pure function of the board, the sequence ledger and
//! the candidate move. Hypothetical chips are placed on [`Board::with_chip`]
//! copies; the game state itself is only ever borrowed immutably.

use std::cmp::Ordering;

use serde::Serialize;
use sequence_engine::board::{cells_for_card, is_corner, Board, Pos, SIZE};
use sequence_engine::game::GameState;
use sequence_engine::player::Player;
use sequence_engine::rules::{Move, MoveAction};
use sequence_engine::sequence::{find_new_sequences, run_length, Direction, SequenceLedger};

use crate::weights::Weights;

/// Center weighting, multiplied by [`Weights::center_bonus`].
const CENTER: [[u8; SIZE]; SIZE] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 1, 2, 2, 1, 0, 0, 0],
    [0, 0, 0, 1, 2, 2, 1, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Per-dimension scores of one candidate move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub offense: f64,
    pub defense: f64,
    pub potential: f64,
    /// Jack penalty, subtracted from the total
    pub conservation: f64,
    pub position: f64,
}

impl Breakdown {
    pub fn total(&self) -> f64 {
        self.offense + self.defense + self.potential + self.position - self.conservation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub mv: Move,
    pub breakdown: Breakdown,
    pub total: f64,
    /// Placement completes at least one new sequence
    pub creates_sequence: bool,
    /// Placement takes a cell that extends an opponent line, or any removal
    pub blocks_opponent: bool,
    /// Completes enough sequences to end the game; outranks every total
    pub wins_game: bool,
}

/// Facts about the whole legal set that individual scores depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub player: Player,
    /// A non-Jack move completes a sequence or makes a critical block.
    pub critical_non_jack: bool,
    /// Sequences the player still needs to win
    pub needed: usize,
}

impl EvalContext {
    pub fn new(state: &GameState, moves: &[Move]) -> Self {
        let player = state.active_player();
        let critical_non_jack = moves.iter().any(|m| match m.action {
            MoveAction::Place(pos) if !m.uses_jack() => {
                is_critical(state.board(), state.ledger(), pos, player)
            }
            _ => false,
        });
        Self {
            player,
            critical_non_jack,
            needed: state
                .config()
                .sequences_to_win
                .saturating_sub(state.sequence_count(player)),
        }
    }
}

/// Scores `mv` for the active player against the current legal set.
pub fn evaluate(state: &GameState, mv: Move, weights: &Weights) -> Evaluation {
    let ctx = EvalContext::new(state, &state.legal_moves());
    evaluate_in(state, &ctx, mv, weights)
}

pub fn evaluate_in(state: &GameState, ctx: &EvalContext, mv: Move, weights: &Weights) -> Evaluation {
    let board = state.board();
    let ledger = state.ledger();
    let player = ctx.player;
    let mut eval = Evaluation {
        mv,
        breakdown: Breakdown::default(),
        total: 0.0,
        creates_sequence: false,
        blocks_opponent: false,
        wins_game: false,
    };
    match mv.action {
        MoveAction::Place(pos) => {
            let completed = find_new_sequences(board, ledger, pos, player).len();
            eval.creates_sequence = completed > 0;
            eval.wins_game = completed > 0 && completed >= ctx.needed;
            eval.breakdown.offense = offense(board, ledger, pos, player, weights);
            eval.breakdown.defense = placement_defense(board, ledger, pos, player.opponent(), weights);
            eval.breakdown.potential = potential(board, pos, player, weights);
            eval.breakdown.position = position(pos, weights);
            eval.blocks_opponent = eval.breakdown.defense > 0.0;
        }
        MoveAction::Remove(pos) => {
            eval.breakdown.defense = removal_defense(board, pos, player.opponent(), weights);
            eval.blocks_opponent = true;
        }
        MoveAction::Discard => return eval,
    }
    if mv.uses_jack() {
        eval.breakdown.conservation = conservation(ctx, weights);
    }
    eval.total = eval.breakdown.total();
    eval
}

/// Highest-scoring move. A game-winning placement beats any total; ties go
/// to the earlier target cell in scan order, discards last, then to the
/// earlier move in `moves`.
pub fn best_move(state: &GameState, moves: &[Move], weights: &Weights) -> Option<Evaluation> {
    let ctx = EvalContext::new(state, moves);
    let mut best: Option<Evaluation> = None;
    for &mv in moves {
        let eval = evaluate_in(state, &ctx, mv, weights);
        let better = match &best {
            None => true,
            Some(b) => rank(&eval, b) == Ordering::Less,
        };
        if better {
            best = Some(eval);
        }
    }
    best
}

/// Every legal move scored, best first, using the same ordering as
/// [`best_move`].
pub fn rank_moves(state: &GameState, weights: &Weights) -> Vec<Evaluation> {
    let moves = state.legal_moves();
    let ctx = EvalContext::new(state, &moves);
    let mut evals: Vec<Evaluation> = moves
        .iter()
        .map(|&mv| evaluate_in(state, &ctx, mv, weights))
        .collect();
    // stable sort keeps enumeration order for full ties
    evals.sort_by(rank);
    evals
}

/// `Less` when `a` is preferred over `b`.
fn rank(a: &Evaluation, b: &Evaluation) -> Ordering {
    b.wins_game
        .cmp(&a.wins_game)
        .then_with(|| b.total.total_cmp(&a.total))
        .then_with(|| tie_key(&a.mv).cmp(&tie_key(&b.mv)))
}

fn tie_key(mv: &Move) -> usize {
    mv.target().map_or(usize::MAX, Pos::scan_index)
}

/// Offense: completion saturates at `win_sequence`, otherwise the longest
/// hypothetical run through `pos` picks the tier.
pub fn offense(board: &Board, ledger: &SequenceLedger, pos: Pos, player: Player, w: &Weights) -> f64 {
    if !find_new_sequences(board, ledger, pos, player).is_empty() {
        return w.win_sequence;
    }
    let hypothetical = board.with_chip(pos, player);
    let longest = Direction::ALL
        .iter()
        .map(|&d| run_length(&hypothetical, pos, player, d))
        .max()
        .unwrap_or(0);
    match longest {
        0 => 0.0,
        1 => w.new_potential,
        2 => w.extend_2,
        3 => w.extend_3,
        _ => w.extend_4,
    }
}

/// Defense of a placement: what the opponent's chip on `pos` would have done,
/// summed over directions and capped at one `block_win`.
pub fn placement_defense(
    board: &Board,
    ledger: &SequenceLedger,
    pos: Pos,
    opponent: Player,
    w: &Weights,
) -> f64 {
    let completions = find_new_sequences(board, ledger, pos, opponent);
    let hypothetical = board.with_chip(pos, opponent);
    Direction::ALL
        .iter()
        .map(|&dir| {
            if completions.iter().any(|s| s.direction == dir) {
                return w.block_win;
            }
            match run_length(&hypothetical, pos, opponent, dir) {
                0 | 1 => 0.0,
                2 => w.block_2,
                3 => w.block_3,
                _ => w.block_4,
            }
        })
        .sum::<f64>()
        .min(w.block_win)
}

/// Defense of a removal: the opponent's current run through the removed chip,
/// capped like [`placement_defense`].
pub fn removal_defense(board: &Board, pos: Pos, opponent: Player, w: &Weights) -> f64 {
    Direction::ALL
        .iter()
        .map(|&dir| match run_length(board, pos, opponent, dir) {
            0 | 1 => 0.0,
            2 => w.block_3,
            3 => w.block_4,
            _ => w.block_win,
        })
        .sum::<f64>()
        .min(w.block_win)
}

/// Directions in which the chip would sit in a run of three or more.
pub fn potential(board: &Board, pos: Pos, player: Player, w: &Weights) -> f64 {
    let hypothetical = board.with_chip(pos, player);
    let directions = Direction::ALL
        .iter()
        .filter(|&&d| run_length(&hypothetical, pos, player, d) >= 3)
        .count();
    directions as f64 * w.flexibility
}

pub fn conservation(ctx: &EvalContext, w: &Weights) -> f64 {
    if ctx.critical_non_jack {
        w.jack_save
    } else {
        w.jack_save * w.jack_relief
    }
}

pub fn position(pos: Pos, w: &Weights) -> f64 {
    let mut score = f64::from(CENTER[pos.row][pos.col]) * w.center_bonus;
    if is_corner_adjacent(pos) {
        score += w.corner_use;
    }
    score
}

pub fn is_corner_adjacent(pos: Pos) -> bool {
    let near = |a: usize, b: usize| a.abs_diff(b) <= 1;
    !is_corner(pos)
        && [(0, 0), (0, SIZE - 1), (SIZE - 1, 0), (SIZE - 1, SIZE - 1)]
            .iter()
            .any(|&(r, c)| near(pos.row, r) && near(pos.col, c))
}

/// Completion for `player`, or an opponent completion or four-run that a chip
/// on `pos` would stop.
fn is_critical(board: &Board, ledger: &SequenceLedger, pos: Pos, player: Player) -> bool {
    if !find_new_sequences(board, ledger, pos, player).is_empty() {
        return true;
    }
    let opponent = player.opponent();
    if !find_new_sequences(board, ledger, pos, opponent).is_empty() {
        return true;
    }
    let hypothetical = board.with_chip(pos, opponent);
    Direction::ALL
        .iter()
        .any(|&d| run_length(&hypothetical, pos, opponent, d) >= 4)
}

/// Summary of a hand for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandAnalysis {
    pub total_cards: usize,
    pub two_eyed_jacks: usize,
    pub one_eyed_jacks: usize,
    pub dead_cards: usize,
    /// Non-Jack cards with both cells still open
    pub flexible_cards: usize,
}

pub fn analyze_hand(state: &GameState, player: Player) -> HandAnalysis {
    let board = state.board();
    let mut analysis = HandAnalysis::default();
    for &card in state.hand(player).cards() {
        analysis.total_cards += 1;
        if card.is_two_eyed_jack() {
            analysis.two_eyed_jacks += 1;
        } else if card.is_one_eyed_jack() {
            analysis.one_eyed_jacks += 1;
        } else if state.is_dead(card) {
            analysis.dead_cards += 1;
        } else if cells_for_card(card).iter().all(|&p| board.is_empty(p)) {
            analysis.flexible_cards += 1;
        }
    }
    analysis
}
