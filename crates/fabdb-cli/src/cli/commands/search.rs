//! `fabdb search` - Search for cards.

use anyhow::Result;
use colored::Colorize;
use fabdb::{Card, Query};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use super::Context;
use crate::cli::args::SearchArgs;
use crate::output::{self, pitch_label, OutputFormat};

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    identifier: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pitch")]
    pitch: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Keywords")]
    keywords: String,
}

impl From<&Card> for SearchRow {
    fn from(card: &Card) -> Self {
        Self {
            identifier: card.identifier.clone(),
            name: card.name.clone(),
            pitch: pitch_label(card.pitch()).to_string(),
            cost: card.cost().map(|c| c.to_string()).unwrap_or_default(),
            keywords: card.keywords.join(" "),
        }
    }
}

/// Translate command-line filters into a search query
pub fn build_query(args: &SearchArgs) -> Query {
    let mut query = Query::new();
    if let Some(keywords) = &args.keywords {
        query = query.keywords(keywords);
    }
    if let Some(class) = &args.class {
        query = query.class(class);
    }
    if !args.pitch.is_empty() {
        query = query.pitch(args.pitch.clone());
    }
    if !args.cost.is_empty() {
        query = query.cost(args.cost.clone());
    }
    if let Some(rarity) = &args.rarity {
        query = query.rarity(rarity);
    }
    if let Some(set) = &args.set {
        query = query.set(set);
    }
    query
}

pub async fn execute(ctx: Context, args: SearchArgs) -> Result<()> {
    let client = ctx.client()?;
    let mut results = client.search_cards(build_query(&args))?;

    // stop asking for pages once the limit is reached
    let mut cards = Vec::new();
    while args.limit.map_or(true, |limit| cards.len() < limit) {
        match results.next().await? {
            Some(card) => cards.push(card),
            None => break,
        }
    }
    debug!(cards = cards.len(), fetches = results.fetches(), "search finished");

    match ctx.output_format {
        OutputFormat::Pretty => {
            if cards.is_empty() {
                println!("{}", "No cards found.".yellow());
                return Ok(());
            }

            let rows: Vec<SearchRow> = cards.iter().map(SearchRow::from).collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            let total = results
                .total()
                .map_or_else(String::new, |t| format!(" of {t}"));
            println!("{} {}{total}", "Showing:".bold(), cards.len());
        }
        format => output::print_structured(format, &cards)?,
    }

    Ok(())
}
