use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use exam_planner::{ClauseId, DoctorLookup, Workspace};
use tracing::instrument;

use super::{
    parse_clause,
    terminal::{Colorize, CountTable},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Inspect the clause catalog")]
pub struct Catalog {
    #[command(subcommand)]
    command: Option<CatalogCommand>,
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    /// List every clause with its doctor and test counts (default)
    List(List),

    /// Show the doctors and tests of one clause
    Show(Show),

    /// List the distinct doctors required by a set of clauses
    Doctors(Doctors),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Catalog {
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            None => List::default().run(root),
            Some(CatalogCommand::List(command)) => command.run(root),
            Some(CatalogCommand::Show(command)) => command.run(root),
            Some(CatalogCommand::Doctors(command)) => command.run(root),
        }
    }
}

#[derive(Debug, Parser, Default)]
struct List {
    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)?;
        let source = workspace.catalog_source();
        let catalog = workspace.load_catalog()?;

        match self.output {
            OutputFormat::Json => {
                use serde_json::json;

                let clauses: Vec<_> = catalog
                    .iter()
                    .map(|entry| {
                        json!({
                            "id": entry.id().as_str(),
                            "doctors": entry.doctors(),
                            "tests": entry.tests(),
                        })
                    })
                    .collect();
                let output = json!({
                    "source": source.to_string(),
                    "clauses": clauses,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!(
                    "{}",
                    format!("Catalog: {source} ({} clauses)", catalog.len()).info()
                );
                if catalog.is_empty() {
                    println!("{}", "The catalog has no clauses.".dim());
                    return Ok(());
                }

                let mut table = CountTable::with_header("Clause", &["Doctors", "Tests"]);
                for entry in &catalog {
                    table.row(
                        entry.id().as_str(),
                        [entry.doctors().len(), entry.tests().len()],
                    );
                }
                table.print();
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Show {
    /// The clause label, exactly as listed in the catalog
    #[arg(value_parser = parse_clause)]
    id: ClauseId,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let catalog = Workspace::new(root)?.load_catalog()?;

        let Some(entry) = catalog.lookup(&self.id) else {
            anyhow::bail!("Clause '{}' not found", self.id);
        };

        println!("{}", entry.id());
        println!();
        println!("Doctors ({})", entry.doctors().len());
        for doctor in entry.doctors() {
            println!("  • {doctor}");
        }
        println!();
        println!("Tests ({})", entry.tests().len());
        for test in entry.tests() {
            println!("  • {test}");
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Doctors {
    /// The clause labels
    #[arg(required = true, value_parser = parse_clause)]
    clauses: Vec<ClauseId>,
}

impl Doctors {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let catalog = Workspace::new(root)?.load_catalog()?;

        let doctors = catalog.doctors_for(&self.clauses);
        if doctors.is_empty() {
            println!("{}", "No doctors associated with these clauses.".dim());
        }
        for doctor in doctors {
            println!("{doctor}");
        }
        Ok(())
    }
}
