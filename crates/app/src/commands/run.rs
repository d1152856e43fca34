//! The `quiz run` command: generate, answer, score, save.

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, bail};
use quiz_core::model::{Outcome, TagName, TagSet};
use services::{Celebration, Clock, QuizSession, RunOutcome, SessionError};

use super::Context;

pub struct RunOptions {
    pub count: Option<usize>,
    pub save: bool,
    pub duration: Option<u64>,
    pub quiet: bool,
}

pub async fn execute(ctx: &Context, tags: Vec<String>, options: RunOptions) -> Result<()> {
    let app = ctx.services().await?;
    let access = ctx.access(&app.gate());
    let tags: TagSet = tags
        .iter()
        .map(|t| TagName::new(t.as_str()))
        .collect::<Result<_, _>>()
        .context("invalid --tag")?;

    let generator = app.generator();
    let count = match options.count {
        Some(count) => count,
        None => generator.matching_count(&tags).await?,
    };
    let mut session = generator
        .generate(access, &tags, count)
        .await?
        .with_audio_cues(!options.quiet);
    println!(
        "{} questions generated. Problem set ready!\n",
        session.problem_set().len()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    let completed = drive(&mut session, &mut input, &mut output, Clock::default())?;
    if !completed {
        writeln!(output, "Quit before finishing; nothing was scored.")?;
        return Ok(());
    }

    let results = app.results();
    let outcome = results.results(&session)?;
    print_results(&mut output, &outcome)?;

    if !session.access().authorized {
        return Ok(());
    }
    let save = options.save || confirm(&mut input, &mut output, "Save results? [y/N] ")?;
    if save {
        let id = results.save(&mut session, options.duration).await?;
        writeln!(output, "Results saved (run #{id}).")?;
    }
    Ok(())
}

/// Step through the session until every question is answered.
///
/// Returns `false` if the operator quit early.
pub fn drive<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    output: &mut W,
    clock: Clock,
) -> Result<bool> {
    while !session.is_complete() {
        show_current(session, output)?;
        let Some(line) = read_line(input)? else {
            bail!("input ended before the problem set was finished");
        };

        match parse_command(&line) {
            Command::Quit => return Ok(false),
            Command::Next => {
                session.next();
            }
            Command::Prev => {
                session.prev();
            }
            Command::Jump(label) => {
                if let Err(e) = session.jump_to(&label) {
                    writeln!(output, "{e}")?;
                }
            }
            Command::Choose(n) => {
                let choice = session
                    .current()
                    .and_then(|entry| entry.choices().get(n.wrapping_sub(1)))
                    .cloned();
                let Some(choice) = choice else {
                    writeln!(output, "Pick an option number from the list.")?;
                    continue;
                };
                match session.submit_answer(&choice, clock.now()) {
                    Ok(answer) if answer.correct => writeln!(output, "Correct!\n")?,
                    Ok(answer) => {
                        writeln!(output, "Incorrect. Answer: {}\n", answer.correct_answer)?;
                    }
                    Err(e @ SessionError::AlreadyAnswered(_)) => {
                        writeln!(output, "{e}. Proceed to the next question.")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Unknown => {
                writeln!(output, "Enter an option number, n, p, g Q-<n> or q.")?;
            }
        }
    }

    match session.celebration() {
        Celebration::Fanfare => writeln!(output, "PERFECT RUN! You completed the problem set!")?,
        _ => writeln!(output, "NICE JOB! You completed the problem set!")?,
    }
    if session.audio_cue().is_some() {
        write!(output, "\x07")?;
    }
    output.flush()?;
    Ok(true)
}

enum Command {
    Choose(usize),
    Next,
    Prev,
    Jump(String),
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Prev,
        "q" | "quit" => Command::Quit,
        _ => {
            if let Some(label) = line.strip_prefix("g ") {
                Command::Jump(label.trim().to_owned())
            } else if let Ok(n) = line.parse::<usize>() {
                Command::Choose(n)
            } else {
                Command::Unknown
            }
        }
    }
}

fn show_current<W: Write>(session: &QuizSession, output: &mut W) -> Result<()> {
    let progress = session.progress();
    let Some(entry) = session.current() else {
        return Ok(());
    };
    writeln!(
        output,
        "{}    [{} / {} answered]",
        entry.sequence_number().heading(),
        progress.answered,
        progress.total
    )?;
    writeln!(output, "{}", entry.question())?;
    for (i, choice) in entry.choices().iter().enumerate() {
        writeln!(output, "  {}) {choice}", i + 1)?;
    }
    if entry.done() {
        writeln!(output, "(already answered)")?;
    }
    write!(output, "> ")?;
    output.flush()?;
    Ok(())
}

fn print_results<W: Write>(output: &mut W, outcome: &RunOutcome) -> Result<()> {
    let result = &outcome.result;
    writeln!(output, "\n== Result Summary ==")?;
    writeln!(output, "Score:          {} / {}", result.score(), result.total())?;
    writeln!(output, "Accuracy:       {}%", result.accuracy_percent())?;
    writeln!(output, "Highest Streak: {}", result.max_streak())?;

    writeln!(output, "\n== Run Chart ==")?;
    for point in &outcome.chart {
        let mark = match point.outcome {
            Outcome::Correct => '+',
            Outcome::Incorrect => 'x',
        };
        writeln!(
            output,
            "{:>4}  {mark}  {:<9}  streak {}",
            point.number,
            point.outcome.as_str(),
            point.streak
        )?;
    }

    writeln!(output, "\n== Incorrect Questions: {} ==", outcome.report.len())?;
    for item in &outcome.report.items {
        writeln!(output, "\n{}", item.sequence_number.heading())?;
        match item.id {
            Some(id) => writeln!(output, "[#{id}] {}", item.question)?,
            None => writeln!(output, "{}", item.question)?,
        }
        writeln!(output, "  Answer: {}", item.answer)?;
        let tags: Vec<&str> = item.tags.iter().map(TagName::as_str).collect();
        writeln!(output, "  Tags:   {}", tags.join(", "))?;
    }
    writeln!(output)?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    Ok(read_line(input)?.is_some_and(|l| matches!(l.trim(), "y" | "Y" | "yes")))
}
