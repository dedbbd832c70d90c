//! `fabdb config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::{self, OutputFormat};

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

/// Keep the first and last four characters of a key
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut config = Config::load()?;
    config.api_key = config.api_key.as_deref().map(mask);
    config.secret_key = config.secret_key.as_deref().map(mask);

    match ctx.output_format {
        OutputFormat::Pretty => {
            let unset = || "(not set)".dimmed().to_string();

            println!("{}", "Current Configuration:".bold());
            println!();
            println!("  {} {}", "api_key:".bold(), config.api_key.unwrap_or_else(unset));
            println!("  {} {}", "secret_key:".bold(), config.secret_key.unwrap_or_else(unset));
            println!("  {} {}", "base_url:".bold(), config.base_url.unwrap_or_else(unset));
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!(
                "  {} {}",
                "page_size:".bold(),
                config.page_size.map_or_else(unset, |s| s.to_string())
            );
        }
        format => output::print_structured(format, &config)?,
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} set.", "Success:".green().bold(), key.cyan());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
