use clap::{Parser, Subcommand};
use tasklist_core::config::{ConfigOverrides, canonicalize_name};
use tasklist_core::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    /// Without a command, starts an interactive session
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task Service base URL (overrides config and TASKLIST_API_URL)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all tasks
    ///
    /// Example: tasklist list
    List,
    /// Create a task
    ///
    /// Example: tasklist add "Buy milk" -d "2 liters"
    Add {
        title: Option<String>,
        #[arg(short = 'd', long = "description", value_name = "TEXT")]
        description: Option<String>,
    },
    /// Flip a task between complete and incomplete
    ///
    /// Example: tasklist toggle 1
    Toggle { id: String },
    /// Delete a task
    ///
    /// Example: tasklist delete 1
    Delete { id: String },
}

/// A line typed into the interactive session.
#[derive(Parser, Debug)]
#[command(name = "tasklist", disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    #[command(flatten)]
    Task(Command),
    /// Fetch the task list again
    Reload,
    /// Set the draft title
    ///
    /// Example: title "Buy milk"
    Title { text: String },
    /// Set the draft description
    ///
    /// Example: description "2 liters"
    Description { text: String },
    /// Show the draft
    Draft,
    /// Create a task from the draft
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    ApiBaseUrl,
    Theme,
    RequestTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "api_base_url" | "api_url" => ConfigOverrideTarget::ApiBaseUrl,
        "theme" => ConfigOverrideTarget::Theme,
        "request_timeout_secs" | "request_timeout" | "timeout" => {
            ConfigOverrideTarget::RequestTimeout
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` (and `--api-url`, which wins) into one set.
pub fn collect_overrides(
    raw_overrides: &[String],
    api_url: Option<&str>,
) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for raw in raw_overrides {
        let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::ApiBaseUrl => overrides.api_base_url = Some(parsed.value),
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::RequestTimeout => {
                let secs = parsed.value.parse::<u64>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "request_timeout_secs must be a whole number, got '{}'",
                        parsed.value
                    ))
                })?;
                overrides.request_timeout_secs = Some(secs);
            }
        }
    }

    if let Some(url) = api_url {
        overrides.api_base_url = Some(url.to_string());
    }

    Ok(overrides)
}
