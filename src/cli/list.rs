use clap::Args;

use crate::cli::OutputFormat;
use crate::core::alignment::AlignmentKind;
use crate::harness::scenarios::{self, Scenario};

#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: &ListArgs, verbose: bool) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Text => print_text(scenarios::all(), verbose),
        OutputFormat::Json => print_json(scenarios::all())?,
    }
    Ok(())
}

fn count(scenario: &Scenario, kind: AlignmentKind) -> usize {
    scenario.records().iter().filter(|r| r.kind == kind).count()
}

fn print_text(scenarios: &[Scenario], verbose: bool) {
    for scenario in scenarios {
        println!("#{}  {}", scenario.number, scenario.title());
        println!(
            "    records: {} primary, {} secondary, {} unaligned{}",
            count(scenario, AlignmentKind::Primary),
            count(scenario, AlignmentKind::Secondary),
            count(scenario, AlignmentKind::Unaligned),
            if scenario.with_secondary {
                "; dumps SEC"
            } else {
                ""
            }
        );
        if let Some(issue) = scenario.known_issue {
            println!("    known issue: {issue}");
        }
        if verbose {
            for note in scenario.notes.iter().skip(1) {
                println!("    {note}");
            }
        }
    }
}

fn print_json(scenarios: &[Scenario]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = scenarios
        .iter()
        .map(|s| {
            serde_json::json!({
                "number": s.number,
                "title": s.title(),
                "primary": count(s, AlignmentKind::Primary),
                "secondary": count(s, AlignmentKind::Secondary),
                "unaligned": count(s, AlignmentKind::Unaligned),
                "with_secondary": s.with_secondary,
                "known_issue": s.known_issue,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
