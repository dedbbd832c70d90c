//! `fabdb diff` - Compare two decks.

use anyhow::{Context as _, Result};
use colored::Colorize;
use fabdb::{CardDiff, DeckDiff};

use super::{deck_slug, Context};
use crate::cli::args::DiffArgs;
use crate::output::{self, OutputFormat};

pub async fn execute(ctx: Context, args: DiffArgs) -> Result<()> {
    let slug_a = deck_slug(&args.deck_a)?;
    let slug_b = deck_slug(&args.deck_b)?;
    let client = ctx.client()?;

    let (deck_a, deck_b) = tokio::try_join!(client.get_deck(&slug_a), client.get_deck(&slug_b))
        .with_context(|| format!("fetching decks {slug_a} and {slug_b}"))?;
    let diff = DeckDiff::new(&deck_a, &deck_b);

    match ctx.output_format {
        OutputFormat::Pretty => {
            println!(
                "{} {} {}",
                deck_a.name.cyan().bold(),
                "->".dimmed(),
                deck_b.name.cyan().bold()
            );
            print_diff(&diff);
        }
        format => output::print_structured(format, &diff)?,
    }

    Ok(())
}

fn print_diff(diff: &DeckDiff) {
    if diff.is_empty() {
        println!();
        println!("{}", "The decks have identical lists.".green());
        return;
    }

    for (title, cards) in diff.sections() {
        let changed: Vec<&CardDiff> = cards.iter().filter(|c| !c.is_unchanged()).collect();
        if changed.is_empty() {
            continue;
        }

        println!();
        println!("{}", title.bold().underline());
        for card in changed {
            for line in card.to_string().lines() {
                match line.chars().next() {
                    Some('+') => println!("{}", line.green()),
                    Some('-') => println!("{}", line.red()),
                    _ => println!("{line}"),
                }
            }
        }
    }
}
