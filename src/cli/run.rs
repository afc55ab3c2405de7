use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tracing::{info, warn};

use crate::cli::open_base_source;
use crate::harness::report::RunReport;
use crate::harness::runner::Runner;
use crate::harness::suite::run_all;
use crate::harness::{scenarios, HarnessConfig, LOADED_DATABASE, SORTED_DATABASE};
use crate::toolchain::process::{ProcessToolchain, ToolPaths};

#[derive(Args)]
pub struct RunArgs {
    /// bam-load executable
    #[arg(long, default_value = "bam-load")]
    pub bam_load: PathBuf,

    /// sra-sort executable
    #[arg(long, default_value = "sra-sort")]
    pub sra_sort: PathBuf,

    /// vdb-dump executable
    #[arg(long, default_value = "vdb-dump")]
    pub vdb_dump: PathBuf,

    /// Reference FASTA supplying read bases (also passed to bam-load)
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Database written by bam-load, overwritten by every scenario
    #[arg(long, default_value = LOADED_DATABASE)]
    pub loaded: PathBuf,

    /// Database written by sra-sort, overwritten by every scenario
    #[arg(long, default_value = SORTED_DATABASE)]
    pub sorted: PathBuf,

    /// Directory for the SAM batch and alias config (a temporary directory by default)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Keep the temporary batch directory after the run
    #[arg(long)]
    pub keep_batch: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: RunArgs, verbose: bool) -> anyhow::Result<ExitCode> {
    let bases = open_base_source(args.reference.as_deref())?;

    // Holding the TempDir keeps it alive until the run is over
    let (work_dir, _temp_dir) = match &args.work_dir {
        Some(dir) => (dir.clone(), None),
        None => {
            let temp = tempfile::Builder::new()
                .prefix("samline-harness-")
                .keep(args.keep_batch)
                .tempdir()?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    if verbose || args.keep_batch {
        eprintln!("Load batches are written to {}", work_dir.display());
    }

    let paths = ToolPaths {
        loader: args.bam_load,
        sorter: args.sra_sort,
        dumper: args.vdb_dump,
    };
    let toolchain =
        ProcessToolchain::new(paths, &work_dir, bases).with_reference_file(args.reference);

    let config = HarnessConfig {
        loaded: args.loaded,
        sorted: args.sorted,
        ..HarnessConfig::default()
    };

    let stdout = std::io::stdout();
    let mut runner = Runner::new(toolchain, config.clone(), stdout.lock());
    let suite = run_all(&mut runner, scenarios::all())?;

    info!(
        passed = suite.all_passed(),
        exit_code = suite.exit_code(),
        "Run complete"
    );

    // The exit status only reflects the scenarios
    if let Some(path) = &args.report {
        match RunReport::new(&config, &suite).write_to(path) {
            Ok(()) if verbose => eprintln!("Report written to {}", path.display()),
            Ok(()) => {}
            Err(e) => warn!(error = %format!("{e:#}"), "Run report not written"),
        }
    }

    Ok(ExitCode::from(suite.exit_code()))
}
