//! End-to-end tests of the binary.
//!
//! The external tools are replaced by small shell scripts so the whole
//! pipeline (batch writing, process spawning, exit status) runs for real.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_list_scenarios() {
    Command::cargo_bin("samline-harness")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("#1  having a single secondary alignment"))
        .stdout(predicate::str::contains("#3  scenario 3"))
        .stdout(predicate::str::contains("vdb-dump crashes"));
}

#[test]
fn test_list_json() {
    let output = Command::cargo_bin("samline-harness")
        .unwrap()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
    assert_eq!(value[0]["primary"], 3);
    assert_eq!(value[0]["secondary"], 2);
    assert_eq!(value[0]["unaligned"], 1);
    assert_eq!(value[0]["with_secondary"], true);
}

#[test]
fn test_emit_writes_batch() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("samline-harness")
        .unwrap()
        .args(["emit", "3", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("batch.sam"));

    let sam = std::fs::read_to_string(dir.path().join("batch.sam")).unwrap();
    assert!(sam.starts_with("@HD"));
    assert!(sam.contains("@SQ\tSN:c1\tLN:"));

    let names: Vec<&str> = sam
        .lines()
        .filter(|l| !l.starts_with('@'))
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(names, vec!["A3", "A1", "A1"]);

    let config = std::fs::read_to_string(dir.path().join("batch.config")).unwrap();
    assert_eq!(config, "c1\tNC_011752.1\n");
}

#[test]
fn test_emit_unknown_scenario() {
    Command::cargo_bin("samline-harness")
        .unwrap()
        .args(["emit", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scenario 9 not found"));
}

#[cfg(unix)]
mod fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn harness(dir: &Path, load: &str, sort: &str, dump: &str) -> Command {
        let bam_load = script(dir, "bam-load", load);
        let sra_sort = script(dir, "sra-sort", sort);
        let vdb_dump = script(dir, "vdb-dump", dump);

        let mut cmd = Command::cargo_bin("samline-harness").unwrap();
        cmd.current_dir(dir)
            .arg("run")
            .arg("--bam-load")
            .arg(bam_load)
            .arg("--sra-sort")
            .arg(sra_sort)
            .arg("--vdb-dump")
            .arg(vdb_dump)
            .arg("--work-dir")
            .arg(dir.join("work"));
        cmd
    }

    #[test]
    fn test_all_scenarios_pass() {
        let dir = tempfile::tempdir().unwrap();

        harness(dir.path(), "exit 0", "exit 0", r#"printf '1\t%s %s\n' "$2" "$3""#)
            .assert()
            .code(0)
            .stdout(predicate::str::contains("test #1"))
            .stdout(predicate::str::contains("test #3"))
            .stdout(predicate::str::contains("AFTER_BAM_LOAD.CSRA.SEC"))
            .stdout(predicate::str::contains("AFTER_SRA_SORT.CSRA.PRIM"))
            .stdout(predicate::str::contains("1\t-T PRIM"));

        assert!(dir.path().join("work").join("batch.sam").exists());
    }

    #[test]
    fn test_sort_failure_exits_with_3() {
        let dir = tempfile::tempdir().unwrap();

        harness(dir.path(), "exit 0", "exit 1", "exit 0")
            .assert()
            .code(3)
            .stdout(predicate::str::contains("sra-sort = FAILED"))
            .stdout(predicate::str::contains("test #2").not());
    }

    #[test]
    fn test_dumper_crash_still_passes() {
        let dir = tempfile::tempdir().unwrap();

        harness(dir.path(), "exit 0", "exit 0", "kill -SEGV $$")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("AFTER_SRA_SORT.CSRA.SEQ"));
    }

    #[test]
    fn test_dumper_crash_keeps_printed_rows() {
        let dir = tempfile::tempdir().unwrap();

        harness(
            dir.path(),
            "exit 0",
            "exit 0",
            r"printf '1\tACGT\n2\tTTTT\n'; kill -SEGV $$",
        )
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "AFTER_SRA_SORT.CSRA.SEQ\n1\tACGT\n2\tTTTT\nAFTER_SRA_SORT.CSRA.PRIM\n",
        ));
    }

    #[test]
    fn test_loader_receives_batch_and_options() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("load-args.txt");
        let load = format!("echo \"$@\" >> {}", args_file.display());

        let report = dir.path().join("report.json");
        harness(dir.path(), &load, "exit 0", "exit 0")
            .arg("--report")
            .arg(&report)
            .assert()
            .code(0);

        let args = std::fs::read_to_string(&args_file).unwrap();
        let lines: Vec<&str> = args.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("-o AFTER_BAM_LOAD.CSRA -k "));
        assert!(lines[0].contains("--make-spots-with-secondary -L 3 -E0 -Q0"));
        assert!(lines[0].ends_with("batch.sam"));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(value["exit_code"], 0);
        assert_eq!(value["scenarios"][2]["status"], "passed");
    }

    #[test]
    fn test_unwritable_report_keeps_exit_status() {
        let dir = tempfile::tempdir().unwrap();

        harness(dir.path(), "exit 0", "exit 0", "exit 0")
            .arg("--report")
            .arg(dir.path().join("missing").join("report.json"))
            .assert()
            .code(0)
            .stderr(predicate::str::contains("Run report not written"));

        harness(dir.path(), "exit 0", "exit 1", "exit 0")
            .arg("--report")
            .arg(dir.path().join("missing").join("report.json"))
            .assert()
            .code(3);
    }

    #[test]
    fn test_missing_loader_exits_with_3() {
        let dir = tempfile::tempdir().unwrap();

        Command::cargo_bin("samline-harness")
            .unwrap()
            .current_dir(dir.path())
            .args(["run", "--bam-load"])
            .arg(dir.path().join("no-such-tool"))
            .assert()
            .code(3)
            .stdout(predicate::str::contains("bam-load = FAILED"));
    }
}
