use sequence_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["sequence"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn game_prints_log_board_and_result() {
    let (code, stdout, stderr) = run_cli(&["game", "--seed", "42"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with("Seed: 42\n"));
    assert!(stdout.contains("turn   0  player 1"));
    assert!(stdout.contains("   0 1 2 3 4 5 6 7 8 9"));
    assert!(stdout.contains("Winner: player") || stdout.contains("Draw after"));
}

#[test]
fn game_is_reproducible_from_seed() {
    let (_, first, _) = run_cli(&["game", "--seed", "5", "--p1", "aggressive"]);
    let (_, second, _) = run_cli(&["game", "--seed", "5", "--p1", "aggressive"]);
    assert_eq!(first, second);
}

#[test]
fn explain_adds_score_lines() {
    let (code, stdout, _) = run_cli(&["game", "--seed", "8", "--max-turns", "4", "--explain"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.matches("score ").count(), 4);
    assert!(stdout.contains("Draw after 4 turns"));
}

#[test]
fn random_players_get_no_explanation() {
    let (code, stdout, _) = run_cli(&[
        "game", "--seed", "8", "--max-turns", "3", "--p1", "random", "--p2", "random",
        "--explain",
    ]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("score "));
}

#[test]
fn unknown_command_prints_usage() {
    let (code, _, stderr) = run_cli(&["replay"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Usage: sequence <command>"));
    assert!(stderr.contains("  stats"));
}

#[test]
fn help_goes_to_stdout() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sim"));
}
