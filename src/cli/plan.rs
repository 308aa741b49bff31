use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use exam_planner::{AgeGroup, ClauseId, PersonProfile, RequirementResult, Sex, Workspace};
use tracing::instrument;

use super::{
    check_clauses, parse_clause,
    terminal::{heading, is_narrow, Colorize},
};

#[derive(Debug, Parser)]
#[command(about = "Compute the doctors and tests required for one person")]
pub struct Plan {
    /// Sex of the examined person.
    #[arg(long, value_enum)]
    sex: SexArg,

    /// Age in completed years.
    #[arg(long, conflicts_with = "birth_date", required_unless_present = "birth_date")]
    age: Option<u32>,

    /// Date of birth (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    birth_date: Option<NaiveDate>,

    /// Date of the examination, used with --birth-date (default: today).
    #[arg(long, value_name = "DATE", requires = "birth_date")]
    on: Option<NaiveDate>,

    /// A selected clause of the order (repeatable).
    #[arg(long = "clause", short = 'c', value_name = "CLAUSE", value_parser = parse_clause)]
    clauses: Vec<ClauseId>,

    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(sex: SexArg) -> Self {
        match sex {
            SexArg::Male => Self::Male,
            SexArg::Female => Self::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Plan {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)?;
        let engine = workspace.engine()?;
        let age_group = self.age_group()?;

        let (_, unknown) = engine.catalog().partition_known(&self.clauses);
        check_clauses(&unknown, workspace.config().strict_clauses)?;

        let sex = Sex::from(self.sex);
        let profile = PersonProfile::new(sex, age_group).with_clauses(self.clauses);
        let result = engine.compute(&profile);

        match self.output {
            OutputFormat::Json => Self::output_json(&profile, &result)?,
            OutputFormat::Table => Self::output_table(&profile, &result),
        }
        Ok(())
    }

    fn age_group(&self) -> anyhow::Result<AgeGroup> {
        match (self.age, self.birth_date) {
            (Some(age), _) => Ok(AgeGroup::from_age(age)),
            (None, Some(birth_date)) => {
                let on = self.on.unwrap_or_else(|| Local::now().date_naive());
                AgeGroup::from_birth_date(birth_date, on).ok_or_else(|| {
                    anyhow::anyhow!("Date of birth {birth_date} is after the examination date {on}")
                })
            }
            (None, None) => anyhow::bail!("Either --age or --birth-date is required"),
        }
    }

    fn output_json(profile: &PersonProfile, result: &RequirementResult) -> anyhow::Result<()> {
        use serde_json::json;

        let clauses: Vec<&str> = profile.clauses().map(ClauseId::as_str).collect();
        let output = json!({
            "sex": profile.sex(),
            "age_group": profile.age_group(),
            "clauses": clauses,
            "doctors": result.doctors,
            "tests": result.tests,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(profile: &PersonProfile, result: &RequirementResult) {
        println!(
            "Examination plan: {}, {}",
            profile.sex(),
            profile.age_group()
        );
        let selected = profile.clauses().count();
        if selected == 0 {
            println!("{}", "No clauses selected; mandatory examination only.".dim());
        } else {
            for clause in profile.clauses() {
                println!("  • {clause}");
            }
        }
        println!();

        Self::print_section("Doctors", &result.doctors);
        println!();
        Self::print_section("Tests", &result.tests);
    }

    fn print_section(title: &str, items: &[String]) {
        println!("{}", heading(&format!("{title} ({})", items.len())));
        for (position, item) in items.iter().enumerate() {
            if is_narrow() {
                println!("{item}");
            } else {
                println!("{:>3}. {item}", position + 1);
            }
        }
    }
}
