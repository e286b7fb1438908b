mod common;

use std::fs;

use anyhow::Result;
use assert_cmd::prelude::*;
use common::{MIT_SOURCE, SLANG_TARGET, TREE_ARGS, head_commit, headerport, init_git_repo, shader_trees, write_file};
use predicates::prelude::*;
use serde_json::Value;

const PATCH: &str = "tools/license_diffs_all.patch";

/// Saves the diffs `generate` proposes for the trees in `dir`.
fn save_patch(dir: &std::path::Path) -> Result<()> {
  headerport(dir)?
    .arg("-q")
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--save-diff", PATCH])
    .assert()
    .success();
  Ok(())
}

#[test]
fn test_round_trip_through_saved_patch() -> Result<()> {
  let dir = shader_trees()?;
  init_git_repo(dir.path())?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  let other = write_file(dir.path(), "slang/b.slang", "void main() {}\n")?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "cg/b.cg", MIT_SOURCE)?;
  save_patch(dir.path())?;

  headerport(dir.path())?
    .arg("apply")
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 2 diff sections to apply"))
    .stdout(predicate::str::contains(
      "-- APPLIED: slang/a.slang  (backup at slang/a.slang.bak)",
    ))
    .stdout(predicate::str::contains("Committed 2 files"));

  let content = fs::read_to_string(&target)?;
  assert!(content.starts_with("#version 450\n\n/*\n * Copyright (c) 2015 Jane Doe\n"));
  assert!(fs::read_to_string(&other)?.ends_with(" */\n\nvoid main() {}\n"));
  assert_eq!(fs::read_to_string(dir.path().join("slang/a.slang.bak"))?, SLANG_TARGET);

  let (_, paths) = head_commit(dir.path())?;
  assert_eq!(paths, vec!["slang/a.slang".to_string(), "slang/b.slang".to_string()]);
  Ok(())
}

#[test]
fn test_apply_captured_dry_run_output() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "slang/licensed.slang", "// SPDX-License-Identifier: MIT\n")?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "cg/licensed.cg", MIT_SOURCE)?;

  let output = headerport(dir.path())?.arg("generate").args(TREE_ARGS).output()?;
  assert!(output.status.success());
  fs::write(dir.path().join("captured.patch"), &output.stdout)?;

  headerport(dir.path())?
    .args(["apply", "captured.patch", "--no-commit"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 1 diff sections to apply"))
    .stdout(predicate::str::contains("-- APPLIED: slang/a.slang"));

  assert!(fs::read_to_string(&target)?.contains(" * MIT License\n"));
  Ok(())
}

#[test]
fn test_malformed_file_paths_are_skipped() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  let separator = "=".repeat(80);
  let patch = format!(
    "\n{separator}\nDIFF for target: slang/a.slang   <=  source: cg/a.cg\n{separator}\n--- \n+++ \n@@ -1 +1,2 @@\n+// header\n #version 450\n"
  );
  fs::write(dir.path().join("bad.patch"), patch)?;

  headerport(dir.path())?
    .args(["apply", "bad.patch"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 1 diff sections to apply"))
    .stdout(predicate::str::contains("No files modified"))
    .stderr(predicate::str::contains("could not find file paths in section, skipping"));

  assert_eq!(fs::read_to_string(&target)?, SLANG_TARGET);
  Ok(())
}

#[test]
fn test_stale_and_missing_targets_are_skipped() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  let gone = write_file(dir.path(), "slang/gone.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "cg/gone.cg", MIT_SOURCE)?;
  save_patch(dir.path())?;

  fs::write(&target, "#version 310 es\nprecision mediump float;\n")?;
  fs::remove_file(&gone)?;

  headerport(dir.path())?
    .args(["apply", PATCH, "--report-json", "report.json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No files modified"))
    .stderr(predicate::str::contains("failed to restore diff for slang/a.slang error:"))
    .stderr(predicate::str::contains(
      "target file does not exist, skipping: slang/gone.slang",
    ));

  assert_eq!(
    fs::read_to_string(&target)?,
    "#version 310 es\nprecision mediump float;\n"
  );
  assert!(!dir.path().join("slang/a.slang.bak").exists());

  let report: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("report.json"))?)?;
  assert_eq!(report["summary"]["mode"], "apply");
  assert_eq!(report["summary"]["failed"], 2);
  assert_eq!(report["items"][0]["status"], "restore_failed");
  assert_eq!(report["items"][1]["status"], "target_missing");
  Ok(())
}

#[test]
fn test_missing_patch_file_fails() -> Result<()> {
  let dir = shader_trees()?;

  headerport(dir.path())?
    .arg("apply")
    .assert()
    .failure()
    .stderr(predicate::str::contains("patch file not found"));

  Ok(())
}

#[test]
fn test_commit_failure_is_fatal() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  save_patch(dir.path())?;

  headerport(dir.path())?
    .arg("apply")
    .assert()
    .failure()
    .stdout(predicate::str::contains("-- APPLIED: slang/a.slang"))
    .stderr(predicate::str::contains("git commit failed"));

  Ok(())
}

#[test]
fn test_root_flag_resolves_targets() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  save_patch(dir.path())?;
  let elsewhere = tempfile::tempdir()?;

  headerport(elsewhere.path())?
    .arg("apply")
    .arg(dir.path().join(PATCH))
    .arg("--root")
    .arg(dir.path())
    .arg("--no-commit")
    .assert()
    .success()
    .stdout(predicate::str::contains("-- APPLIED:"));

  assert!(fs::read_to_string(&target)?.contains(" * MIT License\n"));
  Ok(())
}
