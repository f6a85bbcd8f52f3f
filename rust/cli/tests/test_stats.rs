use std::fs;
use std::io::Write;

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

fn simulate(path: &std::path::Path, games: &str) {
    let (code, _, _) = run_cli(&[
        "sim",
        "--games",
        games,
        "--seed",
        "21",
        "--output",
        path.to_string_lossy().as_ref(),
    ]);
    assert_eq!(code, 0);
}

#[test]
fn stats_summarizes_a_sim_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    simulate(&path, "3");

    let (code, stdout, stderr) = run_cli(&["stats", "--input", path.to_string_lossy().as_ref()]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["games"], 3);
    let decided = v["p1_wins"].as_u64().unwrap() + v["p2_wins"].as_u64().unwrap();
    assert_eq!(decided + v["draws"].as_u64().unwrap(), 3);
    assert!(stderr.is_empty());
}

#[test]
fn stats_reads_compressed_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl.zst");
    simulate(&path, "2");
    let (code, stdout, _) = run_cli(&["stats", "--input", path.to_string_lossy().as_ref()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"games\": 2"));
}

#[test]
fn stats_reports_corrupted_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    simulate(&path, "2");
    let mut f = fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(f, "{{not json").unwrap();
    write!(f, "{{\"game_id\": 9").unwrap();
    drop(f);

    let (code, stdout, stderr) = run_cli(&["stats", "--input", path.to_string_lossy().as_ref()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"games\": 2"));
    assert!(stderr.contains("Skipped 1 corrupted record(s)"));
    assert!(stderr.contains("Discarded 1 incomplete final line(s)"));
}

#[test]
fn stats_walks_directories() {
    let dir = tempfile::tempdir().unwrap();
    simulate(&dir.path().join("a.jsonl"), "1");
    simulate(&dir.path().join("nested").join("b.jsonl"), "2");
    let (code, stdout, _) = run_cli(&["stats", "--input", dir.path().to_string_lossy().as_ref()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"games\": 3"));
}

#[test]
fn stats_fails_on_only_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(&path, "garbage\nmore garbage\n").unwrap();
    let (code, _, stderr) = run_cli(&["stats", "--input", path.to_string_lossy().as_ref()]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error: Invalid input: no valid game records"));
}

#[test]
fn stats_missing_file_is_an_error() {
    let (code, _, stderr) = run_cli(&["stats", "--input", "/nonexistent/games.jsonl"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Failed to read"));
}
