use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use exam_planner::{
    aggregate_columns, aggregate_columns_per_individual, AggregateTally, Analysis, Tally,
    Workspace,
};
use tracing::{info, instrument};

use super::{
    check_clauses,
    terminal::{heading, Colorize, CountTable},
};

#[derive(Debug, Parser)]
#[command(about = "Tally doctor and test visits across a population")]
pub struct Analyze {
    /// Path to the analysis file (YAML)
    file: PathBuf,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Evaluate every person individually instead of once per bucket.
    ///
    /// Gives the same result; useful to cross-check the tallies.
    #[arg(long)]
    per_individual: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl Analyze {
    #[instrument(level = "debug", skip(self), fields(file = %self.file.display()))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)?;
        let engine = workspace.engine()?;
        let analysis = Analysis::load(&self.file)
            .with_context(|| format!("Failed to load analysis {}", self.file.display()))?;

        check_clauses(
            &analysis.unknown_clauses(engine.catalog()),
            workspace.config().strict_clauses,
        )?;

        let tally = if self.per_individual {
            aggregate_columns_per_individual(&engine, &analysis.columns)
        } else {
            aggregate_columns(&engine, &analysis.columns)
        };
        info!(
            columns = analysis.columns.len(),
            population = analysis.population(),
            "analysis aggregated"
        );

        match self.output {
            OutputFormat::Table => Self::output_table(&analysis, &tally),
            OutputFormat::Json => Self::output_json(&analysis, &tally)?,
            OutputFormat::Csv => print!("{}", to_csv(&tally)),
        }
        Ok(())
    }

    fn output_json(analysis: &Analysis, tally: &AggregateTally) -> anyhow::Result<()> {
        use serde_json::json;

        let columns: Vec<_> = analysis
            .columns
            .iter()
            .map(|column| {
                json!({
                    "name": column.name,
                    "population": column.population(),
                })
            })
            .collect();

        let output = json!({
            "population": analysis.population(),
            "columns": columns,
            "doctors": tally.doctors,
            "tests": tally.tests,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(analysis: &Analysis, tally: &AggregateTally) {
        if analysis.population() == 0 {
            println!("No people to examine. Add headcounts to the analysis file.");
            return;
        }

        println!("{}", heading("Population"));
        for column in &analysis.columns {
            println!(
                "  {}: {} (m<40 {}, m40+ {}, f<40 {}, f40+ {})",
                column.name,
                column.population(),
                column.male_under_40,
                column.male_40_or_over,
                column.female_under_40,
                column.female_40_or_over
            );
        }
        println!("  Total: {}", analysis.population());
        println!();

        Self::print_tally("Doctor visits", &tally.doctors);
        println!();
        Self::print_tally("Tests", &tally.tests);
    }

    fn print_tally(title: &str, tally: &Tally) {
        println!("{}", heading(title));
        let mut table = CountTable::default();
        for (name, count) in tally.iter() {
            table.row(name, [count]);
        }
        table.print();
        println!("{}", format!("Total: {}", tally.total()).success());
    }
}

/// Renders a tally as `kind,name,count` rows.
fn to_csv(tally: &AggregateTally) -> String {
    let mut csv = String::from("kind,name,count\n");
    let rows = tally
        .doctors
        .iter()
        .map(|(name, count)| ("doctor", name, count))
        .chain(tally.tests.iter().map(|(name, count)| ("test", name, count)));
    for (kind, name, count) in rows {
        csv.push_str(&format!("{kind},{},{count}\n", csv_field(name)));
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{tempdir, NamedTempFile};

    use super::*;

    fn analysis_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const ANALYSIS: &str = r#"
columns:
  - name: Цех 1
    clauses: ["4.1. Шум"]
    male_under_40: 2
    female_40_or_over: 1
  - name: Офис
    clauses: ["3.5. Работа с персональным компьютером"]
    female_under_40: 3
"#;

    #[test]
    fn run_table_succeeds() {
        let tmp = tempdir().unwrap();
        let file = analysis_file(ANALYSIS);

        let analyze = Analyze {
            file: file.path().to_path_buf(),
            output: OutputFormat::Table,
            per_individual: false,
        };

        analyze
            .run(tmp.path().to_path_buf())
            .expect("analysis should succeed");
    }

    #[test]
    fn run_per_individual_json_succeeds() {
        let tmp = tempdir().unwrap();
        let file = analysis_file(ANALYSIS);

        let analyze = Analyze {
            file: file.path().to_path_buf(),
            output: OutputFormat::Json,
            per_individual: true,
        };

        analyze
            .run(tmp.path().to_path_buf())
            .expect("analysis should succeed");
    }

    #[test]
    fn run_missing_file_fails() {
        let tmp = tempdir().unwrap();

        let analyze = Analyze {
            file: tmp.path().join("missing.yaml"),
            output: OutputFormat::Csv,
            per_individual: false,
        };

        let error = analyze.run(tmp.path().to_path_buf()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to load analysis"));
    }

    #[test]
    fn csv_lists_doctors_then_tests() {
        let mut tally = AggregateTally::default();
        tally.doctors.add("Терапевт", 3);
        tally.tests.add("Флюорография, рентгенография", 2);
        tally.tests.add("Мазок \"на флору\"", 1);

        assert_eq!(
            to_csv(&tally),
            "kind,name,count\n\
             doctor,Терапевт,3\n\
             test,\"Флюорография, рентгенография\",2\n\
             test,\"Мазок \"\"на флору\"\"\",1\n"
        );
    }
}
