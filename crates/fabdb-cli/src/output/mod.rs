//! Output formatting for different formats.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use fabdb::PitchValue;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print `value` as JSON, or as YAML when asked for it.
pub fn print_structured<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Json | OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

/// Pitch name in its own color
pub fn pitch_label(pitch: PitchValue) -> ColoredString {
    match pitch {
        PitchValue::None => "".normal(),
        PitchValue::Red => pitch.name().red(),
        PitchValue::Yellow => pitch.name().yellow(),
        PitchValue::Blue => pitch.name().blue(),
    }
}

fn rules_markup() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        // bold has to be tried before italic
        Regex::new(concat!(
            r"\*\*(?P<bold>.*?)\*\*",
            r"|\*(?P<italic>.*?)\*",
            r"|(?P<resource>\[(?:(?P<count>[123]) )?Resource\])",
            r"|(?P<power>\[(?:Attack|Power)\])",
            r"|(?P<defense>\[Defense\])",
            r"|(?P<life>\[Life\])",
        ))
        .expect("valid rules markup pattern")
    })
}

/// Render fabdb rules-text markup for the terminal
///
/// `**bold**` and `*italic*` become terminal styles; symbol placeholders such
/// as `[Resource]` or `[Power]` become short colored glyphs.
pub fn render_rules_text(text: &str) -> String {
    rules_markup()
        .replace_all(text, |caps: &Captures<'_>| {
            if let Some(m) = caps.name("bold") {
                m.as_str().bold().to_string()
            } else if let Some(m) = caps.name("italic") {
                m.as_str().italic().to_string()
            } else if caps.name("resource").is_some() {
                let count = caps
                    .name("count")
                    .and_then(|c| c.as_str().parse().ok())
                    .unwrap_or(1);
                "*".repeat(count).white().on_red().to_string()
            } else if caps.name("power").is_some() {
                "(P)".black().on_yellow().to_string()
            } else if caps.name("defense").is_some() {
                "(D)".white().on_bright_black().to_string()
            } else {
                "(L)".black().on_green().to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    fn test_rules_text_plain() {
        colored::control::set_override(false);

        assert_eq!(
            render_rules_text("**Go again** *If you've played an attack this turn*"),
            "Go again If you've played an attack this turn"
        );
        assert_eq!(
            render_rules_text("Pay [2 Resource]: gain [1 Resource] and [Resource]"),
            "Pay **: gain * and *"
        );
        assert_eq!(
            render_rules_text("+1[Power], +2[Attack], 1[Defense], 20[Life]"),
            "+1(P), +2(P), 1(D), 20(L)"
        );
        assert_eq!(render_rules_text("no markup here"), "no markup here");
    }

    #[test]
    fn test_unmatched_markup_is_left_alone() {
        colored::control::set_override(false);
        assert_eq!(render_rules_text("a lone * star"), "a lone * star");
        assert_eq!(render_rules_text("[Unknown]"), "[Unknown]");
    }
}
