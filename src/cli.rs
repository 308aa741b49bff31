use std::path::PathBuf;

mod analyze;
mod catalog;
mod plan;
mod terminal;

use analyze::Analyze;
use catalog::Catalog;
use clap::ArgAction;
use exam_planner::{ClauseId, Workspace};
use plan::Plan;
use tracing::instrument;

/// Parse a clause label from the command line.
fn parse_clause(s: &str) -> Result<ClauseId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Reports clauses missing from the catalog.
///
/// In strict mode this is an error; otherwise each clause gets one warning
/// and is ignored by the computation.
fn check_clauses(unknown: &[&ClauseId], strict: bool) -> anyhow::Result<()> {
    use terminal::Colorize;

    let mut distinct: Vec<&ClauseId> = Vec::with_capacity(unknown.len());
    for &clause in unknown {
        if !distinct.contains(&clause) {
            distinct.push(clause);
        }
    }
    if distinct.is_empty() {
        return Ok(());
    }

    if strict {
        let list = distinct
            .iter()
            .map(|clause| format!("'{clause}'"))
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!("Unknown clause(s): {list}");
    }

    for clause in distinct {
        eprintln!(
            "{}",
            format!("⚠️  Unknown clause '{clause}' ignored").warning()
        );
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Catalog(Catalog::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a workspace with a default config and an editable catalog
    Init,

    /// Inspect the clause catalog (default)
    Catalog(Catalog),

    /// Compute the doctors and tests required for one person
    Plan(Plan),

    /// Tally doctor and test visits across a population
    ///
    /// The analysis file lists columns, each with a clause selection and a
    /// headcount for every sex and age bucket.
    Analyze(Analyze),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Catalog(command) => command.run(root)?,
            Self::Plan(command) => command.run(root)?,
            Self::Analyze(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let workspace = Workspace::init(root)?;
        let catalog = workspace.load_catalog()?;

        println!(
            "{}",
            format!(
                "✅ Initialized workspace in {}",
                workspace.root().display()
            )
            .success()
        );
        println!("  Created: .exam/config.toml");
        println!("  Created: .exam/catalog.toml ({} clauses)", catalog.len());
        println!();
        println!("Next steps:");
        println!("  exam catalog list");
        println!("  exam plan --sex female --age 45 --clause \"4.1. Шум\"");

        Ok(())
    }
}
