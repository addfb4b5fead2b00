//! Interactive flashcard study.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use coursekit_core::record::FLASHCARD_FILTER_KEYS;
use coursekit_core::state::AppState;
use coursekit_core::{Flashcard, StudyDeck};

use super::course::{WaitMode, load_course};
use super::questions::select_filter;
use crate::app::Settings;
use crate::cli::FlashcardArgs;
use crate::output;

const HELP: &str = "n: next  p: previous  f: flip  g <N>: go to card  r: reset filters  q: quit";

pub async fn run_flashcards_command(
    state: &mut AppState,
    settings: &Settings,
    args: &FlashcardArgs,
) -> Result<()> {
    let snapshot = load_course(state, settings, &args.id, WaitMode::Stable).await?;
    let Some(set) = snapshot.flashcards.ready() else {
        bail!("Flashcards for course {} are not available", args.id);
    };

    let mut deck = StudyDeck::new(set.flashcards.clone(), &FLASHCARD_FILTER_KEYS);
    select_filter(&mut deck, "category", args.category.as_deref())?;
    select_filter(&mut deck, "difficulty", args.difficulty.as_deref())?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    study(&mut deck, stdin.lock(), &mut stdout)
}

/// Reads one command per line and prints the current card after each.
fn study<R: BufRead, W: Write>(deck: &mut StudyDeck<Flashcard>, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "{HELP}")?;
    show(deck, out)?;
    for line in input.lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("n") => deck.next(),
            Some("p") => deck.prev(),
            Some("f") => deck.toggle_reveal(),
            Some("r") => deck.reset_filters(),
            Some("q") => break,
            Some("g") => {
                let target = words.next().and_then(|n| n.parse::<usize>().ok());
                let moved = target.is_some_and(|n| n >= 1 && deck.go_to(n - 1));
                if !moved {
                    writeln!(out, "No card with that number (1-{})", deck.visible_len())?;
                    continue;
                }
            }
            _ => {
                writeln!(out, "{HELP}")?;
                continue;
            }
        }
        show(deck, out)?;
    }
    Ok(())
}

fn show<W: Write>(deck: &StudyDeck<Flashcard>, out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", deck.summary())?;
    match (deck.current(), deck.navigator().index()) {
        (Some(card), Some(index)) => write!(
            out,
            "{}",
            output::render_flashcard(card, index + 1, deck.visible_len(), deck.navigator().is_revealed())
        )?,
        _ => writeln!(out, "No flashcards match the current filters.")?,
    }
    Ok(())
}
