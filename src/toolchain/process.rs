//! Running the real tools as child processes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::core::alignment::Alignment;
use crate::core::bases::BaseSource;
use crate::io::sam::write_batch;
use crate::toolchain::{Tool, ToolError, Toolchain};

/// Executables for the three tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub loader: PathBuf,
    pub sorter: PathBuf,
    pub dumper: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            loader: PathBuf::from("bam-load"),
            sorter: PathBuf::from("sra-sort"),
            dumper: PathBuf::from("vdb-dump"),
        }
    }
}

impl ToolPaths {
    fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Loader => &self.loader,
            Tool::Sorter => &self.sorter,
            Tool::Dumper => &self.dumper,
        }
    }
}

/// [`Toolchain`] that spawns the configured executables.
///
/// Every call blocks until the child exits. A tool succeeds when it exits
/// with status 0.
pub struct ProcessToolchain {
    paths: ToolPaths,
    work_dir: PathBuf,
    reference_file: Option<PathBuf>,
    bases: Box<dyn BaseSource>,
}

impl ProcessToolchain {
    /// Create a toolchain writing its load batches into `work_dir`.
    pub fn new(paths: ToolPaths, work_dir: impl Into<PathBuf>, bases: Box<dyn BaseSource>) -> Self {
        Self {
            paths,
            work_dir: work_dir.into(),
            reference_file: None,
            bases,
        }
    }

    /// Hand a reference FASTA to the loader (`-r`).
    #[must_use]
    pub fn with_reference_file(mut self, path: Option<PathBuf>) -> Self {
        self.reference_file = path;
        self
    }

    fn command(&self, tool: Tool, args: &[OsString]) -> Command {
        let program = self.paths.program(tool);
        debug!(
            tool = %tool,
            command = %format!(
                "{} {}",
                program.display(),
                args.iter()
                    .map(|a| a.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            "Running"
        );

        let mut command = Command::new(program);
        command.args(args);
        command
    }

    fn check(tool: Tool, status: ExitStatus, output: String) -> Result<(), ToolError> {
        if status.success() {
            Ok(())
        } else {
            warn!(tool = %tool, status = %status, "Tool failed");
            Err(ToolError::Failed {
                tool,
                code: status.code(),
                output,
            })
        }
    }
}

/// Split an option string the way a shell would for these simple options.
fn split_options(options: &str) -> impl Iterator<Item = OsString> + '_ {
    options.split_whitespace().map(OsString::from)
}

/// Remove a database left behind by an earlier run.
fn remove_existing(path: &Path) -> Result<(), ToolError> {
    let result = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };

    result.map_err(|source| ToolError::Cleanup {
        path: path.to_path_buf(),
        source,
    })
}

impl Toolchain for ProcessToolchain {
    fn load(
        &mut self,
        records: &[Alignment],
        output: &Path,
        options: &str,
    ) -> Result<(), ToolError> {
        let batch = write_batch(&self.work_dir, records, self.bases.as_ref())?;
        remove_existing(output)?;

        let mut args: Vec<OsString> = vec![
            "-o".into(),
            output.as_os_str().to_owned(),
            "-k".into(),
            batch.alias_config.into_os_string(),
        ];
        if let Some(reference) = &self.reference_file {
            args.push("-r".into());
            args.push(reference.as_os_str().to_owned());
        }
        args.extend(split_options(options));
        args.push(batch.sam.into_os_string());

        let status = self
            .command(Tool::Loader, &args)
            .status()
            .map_err(|source| ToolError::Spawn {
                tool: Tool::Loader,
                source,
            })?;

        Self::check(Tool::Loader, status, String::new())
    }

    fn sort(&mut self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let args: Vec<OsString> = vec![
            "-f".into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ];

        let status = self
            .command(Tool::Sorter, &args)
            .status()
            .map_err(|source| ToolError::Spawn {
                tool: Tool::Sorter,
                source,
            })?;

        Self::check(Tool::Sorter, status, String::new())
    }

    fn dump(&mut self, database: &Path, options: &str) -> Result<String, ToolError> {
        let mut args: Vec<OsString> = vec![database.as_os_str().to_owned()];
        args.extend(split_options(options));

        let output = self
            .command(Tool::Dumper, &args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ToolError::Spawn {
                tool: Tool::Dumper,
                source,
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Self::check(Tool::Dumper, output.status, text.clone())?;
        Ok(text)
    }
}
