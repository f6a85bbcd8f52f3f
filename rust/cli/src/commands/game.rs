//! Single game with a full move-by-move transcript.

use std::io::Write;

use sequence_ai::evaluator::{self, Evaluation};
use sequence_ai::{Strategy, step_with};
use sequence_engine::game::GameState;
use sequence_engine::player::Player;
use sequence_engine::record::{MoveRecord, Outcome};

use crate::cli::GameArgs;
use crate::config;
use crate::error::CliError;

pub fn handle_game_command(
    game: &GameArgs,
    explain: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::resolve(&game.overrides())?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    let mut state = GameState::new(cfg.game_config(seed))?;
    let bots = [Player::One, Player::Two].map(|p| cfg.bot_for(p));

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Player 1: {}  Player 2: {}", cfg.p1, cfg.p2)?;
    while !state.is_terminal() {
        let player = state.active_player();
        let explanation = if explain {
            (cfg.strategy(player) != Strategy::Random)
                .then(|| cfg.weights_for(player))
                .and_then(|w| evaluator::best_move(&state, &state.legal_moves(), &w))
                .map(|eval| explain_line(&state, &eval))
        } else {
            None
        };
        let record = step_with(&mut state, bots[player.index()].as_ref())?;
        writeln!(out, "{}", format_move(&record))?;
        if let Some(line) = explanation {
            writeln!(out, "{}", line)?;
        }
    }

    writeln!(out)?;
    write!(out, "{}", state.board().render())?;
    let summary = state.summary();
    match summary.outcome {
        Some(Outcome::Win(p)) => writeln!(out, "Winner: {} after {} turns", p, summary.turns)?,
        _ => writeln!(out, "Draw after {} turns", summary.turns)?,
    }
    writeln!(
        out,
        "Sequences: player 1 = {}, player 2 = {}",
        summary.players[0].sequences, summary.players[1].sequences
    )?;
    Ok(())
}

pub fn format_move(rec: &MoveRecord) -> String {
    let action = match rec.target {
        Some(pos) => format!("{} {} at {}", rec.action.as_str(), rec.card, pos),
        None => format!("{} {}", rec.action.as_str(), rec.card),
    };
    let mut line = format!("turn {:>3}  {}  {}", rec.turn, rec.player, action);
    if rec.sequences_completed() > 0 {
        line.push_str(&format!("  +{} sequence", rec.sequences_completed()));
    }
    if !rec.retracted.is_empty() {
        line.push_str(&format!("  -{} retracted", rec.retracted.len()));
    }
    line
}

fn explain_line(state: &GameState, eval: &Evaluation) -> String {
    let b = &eval.breakdown;
    let hand = evaluator::analyze_hand(state, state.active_player());
    format!(
        "          score {:.1} = offense {:.1} + defense {:.1} + potential {:.1} + position {:.1} - jack {:.1}; hand {} cards, {} dead, {} jacks",
        eval.total,
        b.offense,
        b.defense,
        b.potential,
        b.position,
        b.conservation,
        hand.total_cards,
        hand.dead_cards,
        hand.two_eyed_jacks + hand.one_eyed_jacks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequence_engine::board::Pos;
    use sequence_engine::record::ActionKind;

    #[test]
    fn discard_lines_have_no_target() {
        let rec = MoveRecord {
            turn: 12,
            player: Player::Two,
            card: "2S".parse().unwrap(),
            action: ActionKind::Discard,
            target: None,
            sequences: Vec::new(),
            retracted: Vec::new(),
        };
        assert_eq!(format_move(&rec), "turn  12  player 2  discard 2S");
    }

    #[test]
    fn placement_lines_show_cell() {
        let rec = MoveRecord {
            turn: 0,
            player: Player::One,
            card: "10H".parse().unwrap(),
            action: ActionKind::Place,
            target: Some(Pos::new(1, 8)),
            sequences: Vec::new(),
            retracted: Vec::new(),
        };
        assert_eq!(format_move(&rec), "turn   0  player 1  place 10H at (1, 8)");
    }
}
