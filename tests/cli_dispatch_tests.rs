use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_duel-arena")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("duel-arena-cli-{name}-{stamp}.txt"))
}

/// Command isolated from any config file or stats ledger in the working directory.
fn arena(stats: &PathBuf) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("DUEL_ARENA_CONFIG", unique_temp_path("no-config"))
        .env("DUEL_ARENA_STATS", stats)
        .env_remove("DUEL_ARENA_SEED")
        .env_remove("DUEL_ARENA_STATS_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn unknown_command_prints_usage() {
    let output = Command::new(bin())
        .arg("serve")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: duel-arena"));
}

#[test]
fn roster_lists_four_archetypes() {
    let output = Command::new(bin())
        .arg("roster")
        .output()
        .expect("roster should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("roster should emit json");
    let profiles = payload.as_array().expect("array of profiles");
    assert_eq!(profiles.len(), 4);
    assert_eq!(profiles[0]["special_name"], "Shadow Strike");
    assert_eq!(profiles[3]["max_health"], 120);
}

#[test]
fn auto_duel_emits_reproducible_json() {
    let stats = unique_temp_path("auto-json");
    let run = || {
        arena(&stats)
            .args(["auto", "ninja", "pirate", "2", "11"])
            .output()
            .expect("auto should run")
    };
    let first = run();
    let second = run();

    assert_eq!(first.status.code(), Some(0));
    assert_eq!(first.stdout, second.stdout);
    let payload: serde_json::Value =
        serde_json::from_slice(&first.stdout).expect("auto should emit json");
    assert_eq!(payload["a"]["archetype"], "ninja");
    assert_eq!(payload["b"]["archetype"], "pirate");
    assert!(payload["rounds"].as_u64().is_some_and(|r| r >= 1));
    assert!(!stats.exists(), "auto without --record must not touch the ledger");
}

#[test]
fn auto_table_prints_header_and_row() {
    let stats = unique_temp_path("auto-table");
    let output = arena(&stats)
        .args(["auto", "samurai", "viking", "3", "5", "--table"])
        .output()
        .expect("auto should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("outcome\twinner"));
    assert!(lines[1].contains("\t5\t"));
}

#[test]
fn auto_record_writes_both_fighters_to_the_ledger() {
    let stats = unique_temp_path("auto-record");
    let output = arena(&stats)
        .args(["auto", "viking", "ninja", "2", "21", "--record"])
        .output()
        .expect("auto should run");

    assert_eq!(output.status.code(), Some(0));
    let ledger = fs::read_to_string(&stats).expect("ledger written");
    let mut names: Vec<_> = ledger
        .lines()
        .map(|line| line.split('|').next().unwrap_or_default().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ninja".to_string(), "Viking".to_string()]);

    let _ = fs::remove_file(stats);
}

#[test]
fn auto_requires_two_classes() {
    let stats = unique_temp_path("auto-usage");
    let output = arena(&stats)
        .args(["auto", "ninja"])
        .output()
        .expect("auto should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: duel-arena auto"));
}

#[test]
fn auto_rejects_unknown_class() {
    let stats = unique_temp_path("auto-unknown");
    let output = arena(&stats)
        .args(["auto", "ninja", "knight"])
        .output()
        .expect("auto should run");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown class 'knight'"));
}

#[test]
fn stats_lists_saved_records() {
    let stats = unique_temp_path("stats-list");
    fs::write(&stats, "Rin|3|1\nAnne|0|2\n").expect("fixture should be written");

    let output = arena(&stats).arg("stats").output().expect("stats should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rin  wins 3  losses 1"));
    assert!(stdout.contains("Anne  wins 0  losses 2"));

    let _ = fs::remove_file(stats);
}

#[test]
fn stats_on_missing_ledger_says_so() {
    let stats = unique_temp_path("stats-empty");
    let output = arena(&stats).arg("stats").output().expect("stats should run");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No saved stats yet."));
}

#[test]
fn balance_reports_every_pairing() {
    let stats = unique_temp_path("balance");
    let output = arena(&stats)
        .args(["balance", "4", "9"])
        .output()
        .expect("balance should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("balance should emit json");
    let rows = payload.as_array().expect("array of matchups");
    assert_eq!(rows.len(), 16);
    assert!(rows.iter().all(|row| row["duels"] == 4));
}

#[test]
fn play_menu_exit_returns_zero() {
    let stats = unique_temp_path("play-exit");
    let mut child = arena(&stats)
        .arg("play")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("play should start");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"3\n")
        .expect("menu choice written");
    let output = child.wait_with_output().expect("play should exit");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("1 Start duel"));
}

#[test]
fn play_full_duel_records_result() {
    let stats = unique_temp_path("play-duel");
    let mut child = arena(&stats)
        .env("DUEL_ARENA_SEED", "13")
        .arg("play")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("play should start");
    {
        // Start, standard, Viking vs Samurai, names. Input then runs dry, so every
        // turn falls back to a basic attack and the session ends at the menu.
        let mut stdin = child.stdin.take().expect("stdin piped");
        stdin
            .write_all(b"1\n2\n4\n3\nBjorn\nKen\n")
            .expect("script written");
    }
    let output = child.wait_with_output().expect("play should exit");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bjorn: The storm is here."));
    assert!(stdout.contains(" wins."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no action chosen"));
    let ledger = fs::read_to_string(&stats).expect("ledger written");
    assert!(ledger.contains("Bjorn|"));
    assert!(ledger.contains("Ken|"));

    let _ = fs::remove_file(stats);
}
