//! Line-based console collaborators: prompts with bounded retries, a human
//! [ActionSource], and a plain-text renderer for [DuelEvent]s.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::combat::{Action, ActionSource, DuelEvent, DuelOutcome, DuelSink, Fighter, FighterSnapshot};
use crate::config::DEFAULT_INPUT_ATTEMPTS;
use crate::data::parse_relaxed_int;

pub const HEALTH_BAR_WIDTH: usize = 24;
const NAME_COLUMN_WIDTH: usize = 24;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no valid choice between {min} and {max} after {attempts} attempts")]
    Exhausted { min: u32, max: u32, attempts: u32 },

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::with_attempts(input, output, DEFAULT_INPUT_ATTEMPTS)
    }

    pub fn with_attempts(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, text: &str) -> Result<(), InputError> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Reads one line without the trailing newline. `None` at end of input.
    fn next_line(&mut self) -> Result<Option<String>, InputError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.say(prompt)?;
        Ok(self.next_line()?.unwrap_or_default())
    }

    pub fn wait_for_enter(&mut self, prompt: &str) -> Result<(), InputError> {
        self.say(prompt)?;
        self.next_line()?;
        Ok(())
    }

    /// Re-prompts on unparsable or out-of-range input until attempts run out.
    pub fn read_choice(&mut self, prompt: &str, min: u32, max: u32) -> Result<u32, InputError> {
        for _ in 0..self.max_attempts {
            self.say(prompt)?;
            let Some(line) = self.next_line()? else {
                break;
            };
            // Surrounding whitespace (a pasted space, a CRLF remnant) is forgiven.
            match parse_relaxed_int(line.trim()) {
                None => self.say("Invalid input.\n")?,
                Some(value) if value < i64::from(min) || value > i64::from(max) => {
                    self.say("Out of range.\n")?
                }
                Some(value) => return Ok(value as u32),
            }
        }
        Err(InputError::Exhausted {
            min,
            max,
            attempts: self.max_attempts,
        })
    }
}

/// Human action source reading `1` or `2` from the console.
pub struct ConsoleActions<R, W> {
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> ConsoleActions<R, W> {
    pub fn new(prompter: Prompter<R, W>) -> Self {
        Self { prompter }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    fn menu(actor: &Fighter) -> String {
        let cost = actor.profile().special_mana_cost;
        let mut special = format!("2 Special ability ({cost}MP)");
        if !actor.can_use_special() {
            special.push_str(" (on cooldown)");
        }
        if !actor.has_mana_for_special() {
            special.push_str(" (not enough MP)");
        }
        format!("1 Basic attack\n{special}\n")
    }
}

impl<R: BufRead, W: Write> ActionSource for ConsoleActions<R, W> {
    fn choose_action(&mut self, actor: &Fighter, _opponent: &Fighter) -> Action {
        let chosen = self
            .prompter
            .say(&Self::menu(actor))
            .and_then(|()| self.prompter.read_choice("Choose 1 or 2: ", 1, 2));
        match chosen {
            Ok(choice) => Action::from_choice(choice).unwrap_or(Action::Basic),
            Err(err) => {
                tracing::warn!(%err, fighter = actor.name(), "no action chosen, attacking");
                Action::Basic
            }
        }
    }
}

/// Writes rendered events to any writer. Write failures are logged, not raised.
pub struct ConsoleSink<W> {
    output: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> DuelSink for ConsoleSink<W> {
    fn emit(&mut self, event: DuelEvent) {
        let text = render_event(&event);
        if let Err(err) = self.output.write_all(text.as_bytes()).and_then(|()| self.output.flush()) {
            tracing::warn!(%err, "console write failed");
        }
    }
}

pub fn health_bar(hp: u32, max_hp: u32) -> String {
    let max_hp = max_hp.max(1);
    let hp = hp.min(max_hp);
    let filled = (f64::from(hp) / f64::from(max_hp) * HEALTH_BAR_WIDTH as f64) as usize;
    let filled = filled.min(HEALTH_BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(HEALTH_BAR_WIDTH - filled))
}

fn status_line(fighter: &FighterSnapshot) -> String {
    let label = format!("{} ({})", fighter.name, fighter.archetype);
    format!(
        "{label:<NAME_COLUMN_WIDTH$} {} HP {:>3}  CD ({:>2} turns)  MP [{}/{}]\n",
        health_bar(fighter.health, fighter.max_health),
        fighter.health,
        fighter.cooldown,
        fighter.mana,
        fighter.max_mana
    )
}

pub fn render_event(event: &DuelEvent) -> String {
    match event {
        DuelEvent::Intro { name, line, .. } => format!("{name}: {line}\n"),
        DuelEvent::Status { a, b } => format!("\n{}{}\n", status_line(a), status_line(b)),
        DuelEvent::TurnStart { name, .. } => format!("Turn {name}\n"),
        DuelEvent::SpecialUnavailable { .. } => "Special not ready. Using basic attack.\n".to_string(),
        DuelEvent::Special { name, ability, damage, .. } => {
            format!("{name}: {ability}\n{ability} deals {damage}.\n")
        }
        DuelEvent::Basic { name, flourish, damage, .. } => {
            let result = if *damage == 0 {
                "Miss.".to_string()
            } else {
                format!("Hit for {damage}.")
            };
            format!("{name}: {flourish}\n{result}\n")
        }
        DuelEvent::Outcome { outcome, winner } => match (outcome, winner) {
            (DuelOutcome::Draw, _) | (_, None) => "Draw.\n".to_string(),
            (_, Some(winner)) => format!("{winner} wins.\n"),
        },
        DuelEvent::Summary { name, summary, .. } => match summary {
            None => format!("{name} landed no damaging hits.\n"),
            Some(s) => format!(
                "{name} hits {} total {} max {} avg {:.2}\n",
                s.hits, s.total, s.max, s.average
            ),
        },
    }
}
