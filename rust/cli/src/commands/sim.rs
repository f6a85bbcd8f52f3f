//! Batch simulation: many independent games on scoped worker threads.
//!
//! Game `i` of a batch is seeded `base_seed + i`, so any single game can be
//! replayed with `sequence game --seed <base_seed + i>`. With `--compare`,
//! every pairing of the heuristic presets plays the same seeds.

use std::io::Write;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use sequence_ai::{Bot, Strategy};
use sequence_engine::errors::GameError;
use sequence_engine::game::GameState;
use sequence_engine::player::Player;
use sequence_engine::record::MoveRecord;
use tracing::{debug, info};

use crate::analytics::{BoardAnalytics, GameTally, MoveInsight};
use crate::cli::GameArgs;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::io_utils::create_output;
use crate::records::{BatchSummary, ComparisonRow, GameRecord, MoveLine, SimReport};

/// Cells listed in the text summary.
const HOT_CELLS: usize = 5;

/// What `sim` runs and where it writes.
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    pub games: u64,
    pub threads: Option<usize>,
    /// Game-record JSONL, or comparison rows with `compare`
    pub output: Option<String>,
    pub moves: Option<String>,
    /// Pretty JSON of the batch summary and board analytics
    pub summary: Option<String>,
    pub compare: bool,
}

/// One move with the evaluator's view of it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedMove {
    pub record: MoveRecord,
    pub insight: MoveInsight,
}

/// A finished game, its board analytics and, when requested, its full move
/// log.
#[derive(Debug, Clone)]
pub struct FinishedGame {
    pub record: GameRecord,
    pub moves: Vec<LoggedMove>,
    pub analytics: BoardAnalytics,
}

/// Handle the sim command.
///
/// Prints `Simulated: N games` followed by the batch summary. `output`
/// receives one [`GameRecord`] per line, `moves` one line per move tagged
/// with its game id.
pub fn handle_sim_command(
    opts: &SimOptions,
    game: &GameArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.games == 0 {
        return Err(CliError::InvalidInput("games must be >= 1".to_string()));
    }
    let threads = match opts.threads {
        Some(0) => return Err(CliError::InvalidInput("threads must be >= 1".to_string())),
        Some(t) => t,
        None => thread::available_parallelism().map_or(1, |n| n.get()),
    };
    let threads = threads.min(usize::try_from(opts.games).unwrap_or(usize::MAX));

    let cfg = config::resolve(&game.overrides())?;
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    if opts.compare {
        return run_comparison(&cfg, base_seed, opts, threads, out);
    }

    info!(games = opts.games, threads, base_seed, p1 = %cfg.p1, p2 = %cfg.p2, "simulation batch started");
    let started = Instant::now();
    let finished = run_batch(&cfg, base_seed, opts.games, threads, opts.moves.is_some())?;
    info!(
        games = opts.games,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation batch finished"
    );

    if let Some(path) = opts.output.as_deref() {
        write_game_records(Path::new(path), &finished)?;
    }
    if let Some(path) = opts.moves.as_deref() {
        write_move_records(Path::new(path), &finished)?;
    }

    let mut analytics = BoardAnalytics::default();
    for game in &finished {
        analytics.merge(&game.analytics);
    }
    let records: Vec<GameRecord> = finished.into_iter().map(|f| f.record).collect();
    let summary = BatchSummary::from_records(&records);
    if let Some(path) = opts.summary.as_deref() {
        let report = SimReport {
            base_seed,
            p1: cfg.p1,
            p2: cfg.p2,
            summary: &summary,
            analytics: &analytics,
        };
        let mut w = create_output(Path::new(path))?;
        serde_json::to_writer_pretty(&mut w, &report)?;
        w.write_all(b"\n")?;
        w.flush()?;
    }

    writeln!(out, "Simulated: {} games", opts.games)?;
    writeln!(out, "Base seed: {}", base_seed)?;
    writeln!(out, "Strategies: {} vs {}", cfg.p1, cfg.p2)?;
    write!(out, "{}", summary.render())?;
    writeln!(out, "Moves recorded: {}", analytics.moves)?;
    let hot: Vec<String> = analytics
        .hottest_cells(HOT_CELLS)
        .iter()
        .map(|(pos, n)| format!("{pos} x{n}"))
        .collect();
    if !hot.is_empty() {
        writeln!(out, "Most played cells: {}", hot.join(", "))?;
    }
    if let Some((card, n)) = analytics.top_card() {
        writeln!(out, "Most played card: {card} x{n}")?;
    }
    Ok(())
}

/// Every ordered pairing of the heuristic presets, each over the same
/// `games` seeds.
fn run_comparison(
    cfg: &Config,
    base_seed: u64,
    opts: &SimOptions,
    threads: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    writeln!(
        out,
        "Strategy comparison: {} games per pairing, base seed {}",
        opts.games, base_seed
    )?;
    let mut rows = Vec::new();
    for p1 in Strategy::HEURISTIC {
        for p2 in Strategy::HEURISTIC {
            let pairing = Config {
                p1,
                p2,
                p1_weights: None,
                p2_weights: None,
                ..cfg.clone()
            };
            info!(%p1, %p2, games = opts.games, "comparison pairing started");
            let finished = run_batch(&pairing, base_seed, opts.games, threads, false)?;
            let records: Vec<GameRecord> = finished.into_iter().map(|f| f.record).collect();
            let row = ComparisonRow::new(p1, p2, &BatchSummary::from_records(&records));
            writeln!(out, "{}", row.render())?;
            rows.push(row);
        }
    }
    if let Some(path) = opts.output.as_deref() {
        let mut w = create_output(Path::new(path))?;
        for row in &rows {
            let line = serde_json::to_string(row)?;
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()?;
    }
    Ok(())
}

/// Plays `games` games on `threads` workers. Results come back in game-id
/// order regardless of which worker finished first.
pub fn run_batch(
    cfg: &Config,
    base_seed: u64,
    games: u64,
    threads: usize,
    keep_logs: bool,
) -> Result<Vec<FinishedGame>, CliError> {
    let (tx, rx) = mpsc::channel();
    let stride = threads.max(1) as u64;
    thread::scope(|scope| {
        for worker in 0..stride {
            let tx = tx.clone();
            scope.spawn(move || {
                let mut id = worker;
                while id < games {
                    let result = play_game(cfg, id, base_seed.wrapping_add(id), keep_logs);
                    let failed = result.is_err();
                    if tx.send((id, result)).is_err() || failed {
                        break;
                    }
                    id += stride;
                }
                debug!(worker, "simulation worker done");
            });
        }
    });
    drop(tx);

    let mut finished = Vec::with_capacity(usize::try_from(games).unwrap_or(0));
    for (id, result) in rx {
        finished.push((id, result?));
    }
    finished.sort_by_key(|(id, _)| *id);
    Ok(finished.into_iter().map(|(_, game)| game).collect())
}

fn play_game(
    cfg: &Config,
    game_id: u64,
    seed: u64,
    keep_log: bool,
) -> Result<FinishedGame, GameError> {
    let started = Instant::now();
    let mut state = GameState::new(cfg.game_config(seed))?;
    let players = [Player::One, Player::Two];
    let bots = players.map(|p| cfg.bot_for(p));
    let weights = players.map(|p| cfg.weights_for(p));

    let mut tally = GameTally::default();
    let mut analytics = BoardAnalytics::default();
    let mut moves = Vec::new();
    while !state.is_terminal() {
        let player = state.active_player();
        let mv = bots[player.index()]
            .choose_move(&state)
            .ok_or(GameError::NoLegalMoves)?;
        let insight = MoveInsight::capture(&state, mv, &weights[player.index()]);
        let record = state.apply_move(mv)?;
        tally.add(player, &insight);
        analytics.record_move(&record);
        if keep_log {
            moves.push(LoggedMove { record, insight });
        }
    }
    let summary = state.summary();
    if let Some(winner) = summary.winner {
        analytics.record_winner(state.board(), winner, state.move_log());
    }

    let mut record = GameRecord::new(game_id, [cfg.p1, cfg.p2], summary).with_tally(&tally);
    record.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    record.ts = Some(chrono::Utc::now().to_rfc3339());
    Ok(FinishedGame {
        record,
        moves,
        analytics,
    })
}

fn write_game_records(path: &Path, finished: &[FinishedGame]) -> Result<(), CliError> {
    let mut w = create_output(path)?;
    for game in finished {
        let line = serde_json::to_string(&game.record)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn write_move_records(path: &Path, finished: &[FinishedGame]) -> Result<(), CliError> {
    let mut w = create_output(path)?;
    for game in finished {
        for logged in &game.moves {
            let line = serde_json::to_string(&MoveLine {
                game_id: game.record.game_id,
                record: &logged.record,
                insight: &logged.insight,
            })?;
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
        }
    }
    w.flush()?;
    Ok(())
}
