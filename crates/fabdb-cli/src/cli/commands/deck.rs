//! `fabdb deck` - Show a deck.

use anyhow::{Context as _, Result};
use colored::Colorize;
use fabdb::{sorted_by_pitch_then_name, Deck, DeckCard};
use tabled::{settings::Style, Table, Tabled};

use super::{deck_slug, Context};
use crate::cli::args::DeckArgs;
use crate::output::{self, pitch_label, OutputFormat};

#[derive(Tabled)]
struct DeckRow {
    #[tabled(rename = "Qty")]
    total: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pitch")]
    pitch: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Type")]
    card_type: String,
}

impl From<&DeckCard> for DeckRow {
    fn from(card: &DeckCard) -> Self {
        Self {
            total: card.total,
            name: card.name.clone(),
            pitch: pitch_label(card.pitch()).to_string(),
            cost: card.cost().map(|c| c.to_string()).unwrap_or_default(),
            card_type: card.card_type.clone().unwrap_or_default(),
        }
    }
}

pub async fn execute(ctx: Context, args: DeckArgs) -> Result<()> {
    let slug = deck_slug(&args.deck)?;
    let client = ctx.client()?;
    let deck = client
        .get_deck(&slug)
        .await
        .with_context(|| format!("fetching deck {slug}"))?;

    match ctx.output_format {
        OutputFormat::Pretty => print_deck(&deck),
        format => output::print_structured(format, &deck)?,
    }

    Ok(())
}

fn print_deck(deck: &Deck) {
    // Header
    println!("{} {}", deck.name.cyan().bold(), format!("({})", deck.slug).dimmed());
    if let Some(format) = &deck.format {
        println!("  {} {format}", "Format:".bold());
    }
    if let Some(hero) = deck.hero() {
        println!("  {} {}", "Hero:".bold(), hero.name);
    }

    print_section("Weapons", deck.weapons().collect());
    print_section("Equipment", deck.equipment().collect());
    print_section("Deck", sorted_by_pitch_then_name(deck.main_deck()));
    print_section("Sideboard", sorted_by_pitch_then_name(&deck.sideboard));

    println!();
    println!("{} {}", "Cards:".bold(), deck.card_count());
}

fn print_section(title: &str, cards: Vec<&DeckCard>) {
    if cards.is_empty() {
        return;
    }

    let count: u32 = cards.iter().map(|c| c.total).sum();
    let rows: Vec<DeckRow> = cards.into_iter().map(DeckRow::from).collect();

    println!();
    println!("{} {}", title.bold().underline(), format!("({count})").dimmed());
    println!("{}", Table::new(rows).with(Style::rounded()));
}
