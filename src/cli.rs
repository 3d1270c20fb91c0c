use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::balance::run_balance_matrix;
use crate::combat::{
    ensure_distinct_names, normalize_name, roster, simulate_cpu_duel, Archetype, Difficulty,
    DuelConfig, DuelEngine, DuelReport, Fighter,
};
use crate::config::ArenaConfig;
use crate::console::{ConsoleActions, ConsoleSink, InputError, Prompter};
use crate::data::{StatRecord, StatsStore};
use crate::parallel::WorkerPool;

const USAGE: &str = "usage: duel-arena <play|auto|balance|stats|roster>";
const BANNER: &str = "\n========================================\n NINJA VERSUS PIRATE DUEL ARENA\n========================================\n\n";
const DEFAULT_BALANCE_ITERATIONS: u32 = 500;
const DEFAULT_BALANCE_SEED: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Auto,
    Balance,
    Stats,
    Roster,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("play") => Some(Command::Play),
        Some("auto") => Some(Command::Auto),
        Some("balance") => Some(Command::Balance),
        Some("stats") => Some(Command::Stats),
        Some("roster") => Some(Command::Roster),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = ArenaConfig::load();
    tracing::debug!(?command, ?config, "dispatching");
    match command {
        Command::Play => handle_play(&config),
        Command::Auto => handle_auto(args, &config),
        Command::Balance => handle_balance(args, &config),
        Command::Stats => handle_stats(args, &config),
        Command::Roster => handle_roster(),
    }
}

/// Positional arguments after the subcommand, flags removed.
fn positional(args: &[String]) -> Vec<&String> {
    args.iter().skip(2).filter(|arg| !arg.starts_with("--")).collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn handle_play(config: &ArenaConfig) -> i32 {
    let stdin = io::stdin();
    let prompter = Prompter::with_attempts(stdin.lock(), io::stdout(), config.input_attempts);
    match play_session(prompter, io::stdout(), config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("input error: {err}");
            1
        }
    }
}

/// Interactive menu loop: start a duel (A human, B CPU), view stats, or exit.
pub fn play_session<R, W, N>(
    mut prompter: Prompter<R, W>,
    mut narration: N,
    config: &ArenaConfig,
) -> Result<(), InputError>
where
    R: BufRead,
    W: Write,
    N: Write,
{
    let store = config.stats_store();
    loop {
        prompter.say(BANNER)?;
        prompter.say("1 Start duel\n2 View stats\n3 Exit\n\n")?;
        match prompter.read_choice("Choice 1 3: ", 1, 3)? {
            3 => return Ok(()),
            2 => {
                prompter.say(BANNER)?;
                prompter.say(&format_stats(&store.load()))?;
                prompter.wait_for_enter("Press Enter to continue.")?;
            }
            _ => {
                let (next, report) = interactive_duel(prompter, &mut narration, config)?;
                prompter = next;
                store.record_outcome(&report);
                prompter.say("\n")?;
                prompter.wait_for_enter("Press Enter to return to the menu.")?;
            }
        }
    }
}

fn choose_class<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    slot: &str,
) -> Result<Archetype, InputError> {
    prompter.say(&format!("\nChoose fighter class for slot {slot}\n"))?;
    for (i, archetype) in Archetype::ALL.iter().enumerate() {
        prompter.say(&format!("{} {archetype}\n", i + 1))?;
    }
    prompter.say("\n")?;
    let choice = prompter.read_choice("Choose 1 4: ", 1, 4)?;
    Ok(Archetype::from_choice(choice).unwrap_or(Archetype::Ninja))
}

fn interactive_duel<R, W, N>(
    mut prompter: Prompter<R, W>,
    narration: &mut N,
    config: &ArenaConfig,
) -> Result<(Prompter<R, W>, DuelReport), InputError>
where
    R: BufRead,
    W: Write,
    N: Write,
{
    prompter.say(BANNER)?;
    prompter.say("Difficulty\n1 Training\n2 Standard\n3 High risk\n\n")?;
    let difficulty = Difficulty::from_level(i64::from(prompter.read_choice("Choose 1 3: ", 1, 3)?));

    let class_a = choose_class(&mut prompter, "A")?;
    let class_b = choose_class(&mut prompter, "B")?;

    let name_a = normalize_name(&prompter.read_line("\nEnter name for fighter A: ")?);
    let mut name_b = normalize_name(&prompter.read_line("Enter name for fighter B: ")?);
    if ensure_distinct_names(&name_a, &mut name_b) {
        prompter.say(&format!("\nNames matched. Second fighter renamed to {name_b}.\n\n"))?;
    }

    let mut engine = DuelEngine::new(
        Fighter::new(name_a, class_a),
        Fighter::new(name_b, class_b),
        DuelConfig::human_vs_cpu(difficulty),
        config.rng(),
    );
    let mut actions = ConsoleActions::new(prompter);
    let mut sink = ConsoleSink::new(narration);
    let report = engine.run(&mut actions, &mut sink);
    Ok((actions.into_prompter(), report))
}

pub fn format_stats(records: &[StatRecord]) -> String {
    if records.is_empty() {
        return "No saved stats yet.\n".to_string();
    }
    let mut out = String::from("Saved fighter stats\n\n");
    for record in records {
        out.push_str(&format!(
            "{}  wins {}  losses {}\n",
            record.name, record.wins, record.losses
        ));
    }
    out
}

fn handle_auto(args: &[String], config: &ArenaConfig) -> i32 {
    let positional = positional(args);
    let (Some(raw_a), Some(raw_b)) = (positional.first(), positional.get(1)) else {
        eprintln!("usage: duel-arena auto <class-a> <class-b> [difficulty] [seed] [--table] [--record]");
        return 2;
    };
    let (a, b) = match (raw_a.parse::<Archetype>(), raw_b.parse::<Archetype>()) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let level = parse_arg(positional.get(2).copied(), "difficulty", config.difficulty.level());
    let difficulty = Difficulty::from_level(i64::from(level));
    let default_seed = config.seed.unwrap_or_else(crate::combat::rng::entropy_seed);
    let seed = parse_arg(positional.get(3).copied(), "seed", default_seed);

    let report = simulate_cpu_duel(a, b, difficulty, seed);
    if has_flag(args, "--record") {
        config.stats_store().record_outcome(&report);
    }

    if has_flag(args, "--table") {
        println!("outcome\twinner\trounds\tseed\ta_health\tb_health");
        println!(
            "{:?}\t{}\t{}\t{}\t{}\t{}",
            report.outcome,
            report.winner.as_deref().unwrap_or("-"),
            report.rounds,
            seed,
            report.a.health_remaining,
            report.b.health_remaining
        );
        return 0;
    }
    print_json(&report, "duel report")
}

fn handle_balance(args: &[String], config: &ArenaConfig) -> i32 {
    let positional = positional(args);
    let iterations = parse_arg(positional.first().copied(), "iterations", DEFAULT_BALANCE_ITERATIONS);
    let seed = parse_arg(
        positional.get(1).copied(),
        "seed",
        config.seed.unwrap_or(DEFAULT_BALANCE_SEED),
    );
    let level = parse_arg(positional.get(2).copied(), "difficulty", config.difficulty.level());

    let matrix = run_balance_matrix(
        Difficulty::from_level(i64::from(level)),
        iterations as usize,
        seed,
        &WorkerPool::with_workers(config.workers),
    );
    print_json(&matrix, "balance report")
}

fn handle_stats(args: &[String], config: &ArenaConfig) -> i32 {
    let store = match positional(args).first() {
        Some(path) => StatsStore::with_format(path.as_str(), config.stats_format),
        None => config.stats_store(),
    };
    print!("{}", format_stats(&store.load()));
    0
}

fn handle_roster() -> i32 {
    print_json(&roster(), "roster")
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn parse_arg<T>(raw: Option<&String>, name: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands_only() {
        assert_eq!(parse_command(&args(&["bin", "auto"])), Some(Command::Auto));
        assert_eq!(parse_command(&args(&["bin", "roster"])), Some(Command::Roster));
        assert_eq!(parse_command(&args(&["bin", "serve"])), None);
        assert_eq!(parse_command(&args(&["bin"])), None);
    }

    #[test]
    fn positional_skips_flags() {
        let a = args(&["bin", "auto", "--table", "ninja", "pirate", "--record"]);
        assert_eq!(positional(&a), vec!["ninja", "pirate"]);
    }

    #[test]
    fn parse_arg_defaults_on_garbage() {
        let raw = "abc".to_string();
        assert_eq!(parse_arg::<u32>(Some(&raw), "rounds", 3), 3);
        let raw = "9".to_string();
        assert_eq!(parse_arg::<u32>(Some(&raw), "rounds", 3), 9);
        assert_eq!(parse_arg::<u64>(None, "seed", 7), 7);
    }

    #[test]
    fn empty_stats_render_placeholder() {
        assert_eq!(format_stats(&[]), "No saved stats yet.\n");
        let records = vec![StatRecord {
            name: "Rin".to_string(),
            wins: 2,
            losses: 1,
        }];
        assert!(format_stats(&records).contains("Rin  wins 2  losses 1"));
    }

    #[test]
    fn play_session_exits_from_menu() {
        let prompter = Prompter::new(Cursor::new(b"3\n".to_vec()), Vec::new());
        let config = ArenaConfig::default();
        assert!(play_session(prompter, Vec::new(), &config).is_ok());
    }

    #[test]
    fn play_session_reports_exhausted_menu_input() {
        let prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        let config = ArenaConfig::default();
        assert!(matches!(
            play_session(prompter, Vec::new(), &config),
            Err(InputError::Exhausted { .. })
        ));
    }
}
