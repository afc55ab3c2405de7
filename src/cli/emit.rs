use std::path::PathBuf;

use clap::Args;

use crate::cli::open_base_source;
use crate::harness::scenarios;
use crate::io::sam::write_batch;

#[derive(Args)]
pub struct EmitArgs {
    /// Scenario number (see `list`)
    #[arg(required = true)]
    pub scenario: usize,

    /// Directory to write the batch into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Reference FASTA supplying read bases
    #[arg(short, long)]
    pub reference: Option<PathBuf>,
}

pub fn run(args: EmitArgs, verbose: bool) -> anyhow::Result<()> {
    let scenario = scenarios::by_number(args.scenario).ok_or_else(|| {
        anyhow::anyhow!(
            "Scenario {} not found (expected 1-{})",
            args.scenario,
            scenarios::all().len()
        )
    })?;

    let bases = open_base_source(args.reference.as_deref())?;
    let records = scenario.records();
    let files = write_batch(&args.output, &records, bases.as_ref())?;

    if verbose {
        eprintln!("Scenario {}: {} records", scenario.number, records.len());
        for record in &records {
            match &record.placement {
                Some(p) => eprintln!(
                    "  {} {} {}:{} {}",
                    record.name, record.kind, p.alias, p.position, record.cigar
                ),
                None => eprintln!("  {} {}", record.name, record.kind),
            }
        }
    }

    println!("{}", files.sam.display());
    println!("{}", files.alias_config.display());

    Ok(())
}
