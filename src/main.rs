use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tally::cli::entries::{AddArgs, EditArgs};
use tally::cli::settings::ThemeChange;
use tally::core::entry::{EntryId, EntryKind};
use tally::core::log::init_logging;
use tally::core::theme::Theme;
use tally::core::view::Filter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl From<ThemeArg> for ThemeChange {
    fn from(arg: ThemeArg) -> ThemeChange {
        match arg {
            ThemeArg::Light => ThemeChange::Set(Theme::Light),
            ThemeArg::Dark => ThemeChange::Set(Theme::Dark),
            ThemeArg::Toggle => ThemeChange::Toggle,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record an income or expense
    Add {
        /// income or expense
        kind: EntryKind,
        /// What the entry is for
        label: String,
        /// Non-negative amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category, e.g. food, salary, transport
        #[arg(short = 'g', long)]
        category: String,
        /// Currency code, defaults to the display currency
        #[arg(short = 'u', long)]
        currency: Option<String>,
    },
    /// Change fields of an existing entry
    Edit {
        id: EntryId,
        #[arg(long = "type")]
        kind: Option<EntryKind>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(short = 'g', long)]
        category: Option<String>,
        #[arg(short = 'u', long)]
        currency: Option<String>,
    },
    /// Delete an entry
    Delete {
        id: EntryId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List entries, newest first
    List {
        /// all, income or expense
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Display income, expenses and balance in the display currency
    Summary,
    /// Show or set the display currency
    Currency { code: Option<String> },
    /// Show or change dark mode
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
    /// Display the current exchange rates
    Rates,
    /// Refresh rates periodically and keep the summary on screen
    Watch,
}

impl From<Commands> for tally::AppCommand {
    fn from(cmd: Commands) -> tally::AppCommand {
        match cmd {
            Commands::Add {
                kind,
                label,
                amount,
                category,
                currency,
            } => tally::AppCommand::Add(AddArgs {
                kind,
                label,
                amount,
                category,
                currency,
            }),
            Commands::Edit {
                id,
                kind,
                label,
                amount,
                category,
                currency,
            } => tally::AppCommand::Edit(EditArgs {
                id,
                kind,
                label,
                amount,
                category,
                currency,
            }),
            Commands::Delete { id, yes } => tally::AppCommand::Delete { id, yes },
            Commands::List { filter } => tally::AppCommand::List(filter),
            Commands::Summary => tally::AppCommand::Summary,
            Commands::Currency { code } => tally::AppCommand::Currency(code),
            Commands::Theme { mode } => tally::AppCommand::Theme(mode.map(Into::into)),
            Commands::Rates => tally::AppCommand::Rates,
            Commands::Watch => tally::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => tally::cli::setup::setup_at_path(path),
            None => tally::cli::setup::setup(),
        },
        Some(cmd) => tally::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
