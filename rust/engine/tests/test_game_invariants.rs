use std::collections::HashMap;

use sequence_engine::cards::{Card, SHOE_SIZE};
use sequence_engine::game::{GameConfig, GameState};
use sequence_engine::player::Player;
use sequence_engine::record::Outcome;
use sequence_engine::rules::{Move, MoveAction};

/// Completes a sequence when it can, otherwise plays the first legal move.
fn greedy(game: &GameState) -> Move {
    let player = game.active_player();
    let moves = game.legal_moves();
    moves
        .iter()
        .copied()
        .find(|m| match m.action {
            MoveAction::Place(p) => game.would_complete(p, player) > 0,
            _ => false,
        })
        .unwrap_or(moves[0])
}

fn play(seed: u64, sequences_to_win: usize) -> GameState {
    let config = GameConfig {
        sequences_to_win,
        ..GameConfig::with_seed(seed)
    };
    let mut game = GameState::new(config).unwrap();
    while !game.is_terminal() {
        let mv = greedy(&game);
        game.apply_move(mv).unwrap();
    }
    game
}

#[test]
fn shoe_is_conserved_every_turn() {
    let mut game = GameState::new(GameConfig::with_seed(2024)).unwrap();
    while !game.is_terminal() {
        assert_eq!(game.card_count(), SHOE_SIZE);
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for c in game.all_cards() {
            *counts.entry(c).or_default() += 1;
        }
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&n| n == 2));
        let mv = greedy(&game);
        game.apply_move(mv).unwrap();
    }
}

#[test]
fn same_seed_replays_the_same_log() {
    let a = play(77, 2);
    let b = play(77, 2);
    assert_eq!(a.move_log(), b.move_log());
    assert_eq!(a.outcome(), b.outcome());
    assert_eq!(a.board(), b.board());
}

#[test]
fn game_ends_exactly_when_the_target_is_reached() {
    for seed in 0..10 {
        let config = GameConfig::with_seed(seed);
        let mut game = GameState::new(config).unwrap();
        while !game.is_terminal() {
            for p in Player::BOTH {
                assert!(game.sequence_count(p) < 2);
            }
            let mv = greedy(&game);
            game.apply_move(mv).unwrap();
        }
        match game.outcome() {
            Some(Outcome::Win(p)) => assert!(game.sequence_count(p) >= 2),
            Some(Outcome::Draw) => assert_eq!(game.turn(), game.config().max_turns),
            None => panic!("terminal game without outcome"),
        }
    }
}

#[test]
fn sequences_share_at_most_one_cell() {
    for seed in 0..10 {
        let game = play(seed, 6);
        for p in Player::BOTH {
            let seqs = game.sequences(p);
            for (i, a) in seqs.iter().enumerate() {
                for b in &seqs[i + 1..] {
                    assert!(a.shared_cells(b) <= 1, "seed {seed}: {a:?} / {b:?}");
                }
                for &pos in &a.cells {
                    assert!(game.is_locked(pos));
                }
            }
        }
    }
}

#[test]
fn legal_moves_are_never_empty_in_a_live_game() {
    let mut game = GameState::new(GameConfig::with_seed(99)).unwrap();
    while !game.is_terminal() {
        let moves = game.legal_moves();
        assert!(!moves.is_empty());
        game.apply_move(moves[moves.len() - 1]).unwrap();
    }
}

#[test]
fn log_turns_are_consecutive() {
    let game = play(3, 2);
    for (i, rec) in game.move_log().iter().enumerate() {
        assert_eq!(rec.turn as usize, i);
    }
    assert_eq!(game.move_log().len() as u32, game.turn());
}

#[test]
fn sequence_counts_only_drop_on_retraction() {
    for seed in 0..12 {
        let config = GameConfig {
            sequences_to_win: 4,
            ..GameConfig::with_seed(seed)
        };
        let mut game = GameState::new(config).unwrap();
        let mut prev = [0usize; 2];
        while !game.is_terminal() {
            let mv = greedy(&game);
            let rec = game.apply_move(mv).unwrap();
            for player in [Player::One, Player::Two] {
                let count = game.sequence_count(player);
                assert!(
                    count >= prev[player.index()] || !rec.retracted.is_empty(),
                    "seed {seed} turn {}: {player} dropped from {} to {count}",
                    rec.turn,
                    prev[player.index()]
                );
                assert_eq!(count, game.sequences(player).len());
                prev[player.index()] = count;
            }
            assert!(game.sequence_count(rec.player) >= rec.sequences_completed());
        }
    }
}
