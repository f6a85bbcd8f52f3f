use sequence_engine::board::{Board, Occupant, Pos};
use sequence_engine::cards::Card;
use sequence_engine::deck::Deck;
use sequence_engine::errors::GameError;
use sequence_engine::game::{GameConfig, GameState};
use sequence_engine::player::{Hand, Player};
use sequence_engine::record::{ActionKind, Outcome};
use sequence_engine::rules::{Move, MoveAction};
use sequence_engine::sequence::Direction;

fn card(text: &str) -> Card {
    text.parse().expect("valid card")
}

fn cards(list: &[&str]) -> Vec<Card> {
    list.iter().map(|c| card(c)).collect()
}

/// Staged game: `draws` lists the cards in the order they will be drawn.
fn staged(one: &[&str], two: &[&str], draws: &[&str], sequences_to_win: usize) -> GameState {
    let config = GameConfig {
        hand_size: one.len(),
        sequences_to_win,
        ..GameConfig::with_seed(5)
    };
    let mut pile = cards(draws);
    pile.reverse();
    GameState::from_parts(
        config,
        5,
        Board::new(),
        Deck::from_cards(pile, 5),
        [Hand::new(cards(one)), Hand::new(cards(two))],
    )
}

fn at(row: usize, col: usize) -> Pos {
    Pos::new(row, col)
}

/// Player one fills (0,1)..(0,3) next to the top-left corner while player two
/// stacks column 8.
fn corner_setup(sequences_to_win: usize) -> GameState {
    let mut game = staged(
        &["2S"],
        &["9H"],
        &["3S", "8H", "4S", "7H", "5S", "JH", "AC"],
        sequences_to_win,
    );
    let script = [
        Move::place(card("2S"), at(0, 1)),
        Move::place(card("9H"), at(2, 8)),
        Move::place(card("3S"), at(0, 2)),
        Move::place(card("8H"), at(3, 8)),
        Move::place(card("4S"), at(0, 3)),
        Move::place(card("7H"), at(4, 8)),
    ];
    for mv in script {
        let rec = game.apply_move(mv).expect("scripted move is legal");
        assert_eq!(rec.sequences_completed(), 0);
    }
    game
}

#[test]
fn fifth_chip_next_to_corner_completes_a_sequence() {
    let mut game = corner_setup(2);
    assert_eq!(game.would_complete(at(0, 4), Player::One), 1);

    let rec = game.apply_move(Move::place(card("5S"), at(0, 4))).unwrap();
    assert_eq!(rec.sequences_completed(), 1);
    assert_eq!(rec.sequences[0].direction, Direction::Horizontal);
    assert_eq!(game.sequence_count(Player::One), 1);
    assert_eq!(game.sequence_count(Player::Two), 0);
    for col in 0..5 {
        assert!(game.is_locked(at(0, col)), "cell (0, {col}) should be locked");
    }
    assert!(!game.is_terminal());
    assert_eq!(game.active_player(), Player::Two);
}

#[test]
fn reaching_the_target_ends_the_game() {
    let mut game = corner_setup(1);
    game.apply_move(Move::place(card("5S"), at(0, 4))).unwrap();
    assert!(game.is_terminal());
    assert_eq!(game.outcome(), Some(Outcome::Win(Player::One)));
    assert_eq!(game.winner(), Some(Player::One));
    assert!(game.legal_moves().is_empty());

    let summary = game.summary();
    assert_eq!(summary.turns, 7);
    assert_eq!(summary.first_sequence_turn, Some(6));
    assert_eq!(summary.first_sequence_player, Some(Player::One));
    assert_eq!(summary.players[0].sequences, 1);
}

#[test]
fn locked_chips_cannot_be_removed() {
    let mut game = corner_setup(2);
    game.apply_move(Move::place(card("5S"), at(0, 4))).unwrap();
    let jack = card("JH");
    assert!(game.hand(Player::Two).contains(jack));

    let err = game.apply_move(Move::remove(jack, at(0, 2))).unwrap_err();
    assert!(matches!(err, GameError::IllegalMove { .. }));
    // every player-one chip is locked, so the Jack is only discardable
    assert_eq!(game.legal_moves(), vec![Move::discard(jack)]);
}

#[test]
fn one_eyed_jack_removes_an_opponent_chip() {
    let mut game = staged(&["2S"], &["JS"], &["4S", "9H"], 2);
    game.apply_move(Move::place(card("2S"), at(0, 1))).unwrap();
    assert_eq!(game.board().owner(at(0, 1)), Some(Player::One));

    let rec = game.apply_move(Move::remove(card("JS"), at(0, 1))).unwrap();
    assert_eq!(rec.action, ActionKind::Remove);
    assert_eq!(rec.target, Some(at(0, 1)));
    assert!(rec.retracted.is_empty());
    assert_eq!(game.board().occupant(at(0, 1)), Occupant::Empty);
    assert_eq!(game.sequence_count(Player::One), 0);
}

#[test]
fn one_eyed_jack_cannot_remove_own_chip() {
    let mut game = staged(&["2S"], &["3S"], &["JS", "9H"], 2);
    game.apply_move(Move::place(card("2S"), at(0, 1))).unwrap();
    game.apply_move(Move::place(card("3S"), at(0, 2))).unwrap();
    let err = game.apply_move(Move::remove(card("JS"), at(0, 1))).unwrap_err();
    assert!(matches!(err, GameError::IllegalMove { .. }));
    assert!(game
        .legal_moves()
        .contains(&Move::remove(card("JS"), at(0, 2))));
}

#[test]
fn dead_card_is_discarded_without_a_target() {
    let mut game = staged(&["2S"], &["JD"], &["2S", "KH", "AC"], 2);
    game.apply_move(Move::place(card("2S"), at(0, 1))).unwrap();
    game.apply_move(Move::place(card("JD"), at(8, 6))).unwrap();

    let dead = card("2S");
    assert!(game.is_dead(dead));
    assert_eq!(game.legal_moves(), vec![Move::discard(dead)]);

    let rec = game.apply_move(Move::discard(dead)).unwrap();
    assert_eq!(rec.action, ActionKind::Discard);
    assert_eq!(rec.target, None);
    assert_eq!(game.hand(Player::One).cards(), &[card("AC")]);
    assert_eq!(game.board().chips(Player::One), 1);
}

#[test]
fn two_eyed_jack_cannot_target_a_corner() {
    let mut game = staged(&["JC"], &["9H"], &["3S", "8H"], 2);
    let err = game.apply_move(Move::place(card("JC"), at(0, 0))).unwrap_err();
    assert!(matches!(err, GameError::IllegalMove { .. }));
    let moves = game.legal_moves();
    assert_eq!(moves.len(), 96);
    assert!(moves
        .iter()
        .all(|m| matches!(m.action, MoveAction::Place(p) if !game.is_locked(p))));
}

#[test]
fn turn_cap_ends_in_a_draw() {
    let config = GameConfig {
        max_turns: 3,
        ..GameConfig::with_seed(11)
    };
    let mut game = GameState::new(config).unwrap();
    while !game.is_terminal() {
        let mv = game.legal_moves()[0];
        game.apply_move(mv).unwrap();
    }
    assert_eq!(game.turn(), 3);
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.winner(), None);
}

#[test]
fn invalid_config_is_rejected() {
    let config = GameConfig {
        hand_size: 0,
        ..GameConfig::default()
    };
    assert!(matches!(
        GameState::new(config),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn unseeded_game_records_its_seed() {
    let game = GameState::new(GameConfig::default()).unwrap();
    let mut replay = GameState::new(GameConfig::with_seed(game.seed())).unwrap();
    assert_eq!(game.hand(Player::One), replay.hand(Player::One));
    assert_eq!(game.deck().draw_pile(), replay.deck().draw_pile());
    let mv = replay.legal_moves()[0];
    assert!(replay.apply_move(mv).is_ok());
}
