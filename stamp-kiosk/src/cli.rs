//! Command line interface and dispatch

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use stamp_card::{KeyValueStore, StampCardService, StampOutcome};

/// Terminal stamp card kiosk
#[derive(Debug, Parser)]
#[command(name = "stamp-kiosk", version, about = "Collect stamps and redeem coupons.")]
pub struct Cli {
    /// Defaults to `show`
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Page load: create the card and apply `?stampId=...` if present
    Visit {
        /// URL query string, e.g. "?stampId=shop-1"
        query: Option<String>,
    },
    /// Collect a stamp from SOURCE
    Stamp {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        source: String,
    },
    /// Redeem an active coupon
    Use {
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        code: String,
    },
    /// Erase stamps and coupons (asks for confirmation)
    Reset {
        /// Do not prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the card
    Show,
}

impl Command {
    pub fn assume_yes(&self) -> bool {
        matches!(self, Command::Reset { yes: true })
    }
}

/// Run `command` and return the text to print on stdout
///
/// Dialog output (notifications, prompts) goes through the service's
/// `UserInteraction`; the returned text is the card or a short status.
pub fn run<S: KeyValueStore>(
    service: &StampCardService<S>,
    command: &Command,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Visit { query } => service.on_load(query.as_deref())?.to_string(),
        Command::Stamp { source } => {
            service.ensure_profile()?;
            if let StampOutcome::Rejected(reason) = service.request_stamp(Some(source))? {
                tracing::debug!(source = %source, reason = %reason, "Stamp not collected");
            }
            service.view()?.to_string()
        }
        Command::Use { code } => match service.mark_coupon_used(code)? {
            Some(_) => service.view()?.to_string(),
            None => format!("No active coupon with code {}", code),
        },
        Command::Reset { .. } => {
            if service.reset()? {
                service.view()?.to_string()
            } else {
                "Reset cancelled".to_string()
            }
        }
        Command::Show => service.view()?.to_string(),
    };
    Ok(output)
}
