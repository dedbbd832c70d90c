//! `fabdb show` - Show one card.

use anyhow::{Context as _, Result};
use colored::Colorize;
use fabdb::Card;

use super::Context;
use crate::cli::args::ShowArgs;
use crate::output::{self, pitch_label, render_rules_text, OutputFormat};

pub async fn execute(ctx: Context, args: ShowArgs) -> Result<()> {
    let client = ctx.client()?;
    let card = client
        .get_card(&args.id)
        .await
        .with_context(|| format!("looking up card {}", args.id))?;

    match ctx.output_format {
        OutputFormat::Pretty => print_card(&card, args.long),
        format => output::print_structured(format, &card)?,
    }

    Ok(())
}

fn print_card(card: &Card, long: bool) {
    // Header: cost, name, pitch
    let cost = card
        .cost()
        .map(|c| format!(" {c} ").white().on_red().to_string())
        .unwrap_or_default();
    println!("{cost} {} {}", card.name.bold(), pitch_label(card.pitch()));

    if long {
        println!("{}", card.keywords.join(" ").dimmed());
    }

    if let Some(text) = &card.text {
        println!();
        println!("{}", render_rules_text(text));
    }
    if let Some(flavor) = card.flavor.as_deref().filter(|f| !f.is_empty()) {
        println!();
        println!("{}", flavor.italic());
    }

    if !long {
        return;
    }

    println!();
    let stats = [
        ("Power", card.stats.attack),
        ("Defense", card.stats.defense),
        ("Life", card.stats.life),
        ("Intellect", card.stats.intellect),
    ];
    let stats: Vec<String> = stats
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{} {v}", format!("{label}:").bold())))
        .collect();
    if !stats.is_empty() {
        println!("  {}", stats.join("   "));
    }

    println!("  {} {}", "Identifier:".bold(), card.identifier.cyan());
    if let Some(rarity) = &card.rarity {
        println!("  {} {rarity}", "Rarity:".bold());
    }
    if let Some(artist) = &card.artist.name {
        println!("  {} {artist}", "Artist:".bold());
    }
    if let Some(comments) = card.comments.as_deref().filter(|c| !c.is_empty()) {
        println!("  {} {comments}", "Comments:".bold());
    }

    if !card.rulings.is_empty() {
        println!();
        println!("{}", "Rulings:".bold().underline());
        for ruling in &card.rulings {
            println!("  {ruling}");
        }
    }
}
