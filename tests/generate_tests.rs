mod common;

use std::fs;

use anyhow::Result;
use assert_cmd::prelude::*;
use common::{
  COMPAT_ONLY_SOURCE, MIT_SOURCE, SLANG_TARGET, TREE_ARGS, head_commit, headerport, init_git_repo, shader_trees,
  write_file,
};
use predicates::prelude::*;
use serde_json::Value;

const EXPECTED_APPLIED: &str = "\
#version 450

/*
 * Copyright (c) 2015 Jane Doe
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * MIT License
 */

layout(location = 0) out vec4 FragColor;
";

#[test]
fn test_dry_run_prints_diff_and_leaves_files() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/crt/crt-geom.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/crt/crt-geom.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "Found 1 candidate pairs (target, source). Showing up to 30.",
    ))
    .stdout(predicate::str::contains(
      "DIFF for target: slang/crt/crt-geom.slang   <=  source: cg/crt/crt-geom.cg",
    ))
    .stdout(predicate::str::contains("--- slang/crt/crt-geom.slang"))
    .stdout(predicate::str::contains("+ * MIT License"))
    .stdout(predicate::str::contains("APPLIED").not());

  assert_eq!(fs::read_to_string(&target)?, SLANG_TARGET);
  assert!(!dir.path().join("slang/crt/crt-geom.slang.bak").exists());
  Ok(())
}

#[test]
fn test_skip_messages() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/a.slang", "// Copyright 2020 Someone\nvoid main() {}\n")?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "slang/b.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/b.cg", "float4 main() {}\n")?;
  write_file(dir.path(), "slang/c.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/c.hlsl", COMPAT_ONLY_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "-- SKIP (target has license): slang/a.slang   <=  cg/a.cg",
    ))
    .stdout(predicate::str::contains(
      "-- NO SOURCE HEADER: cg/b.cg  (no top comment block)",
    ))
    .stdout(predicate::str::contains(
      "-- SKIP (source header lacks license keywords after stripping): cg/c.hlsl",
    ))
    .stdout(predicate::str::contains("DIFF for target").not());

  Ok(())
}

#[test]
fn test_no_pairs() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/only-here.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/only-there.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 0 candidate pairs"))
    .stdout(predicate::str::contains("No candidate diffs found or nothing to show."));

  Ok(())
}

#[test]
fn test_max_pairs_limits_examined_pairs() -> Result<()> {
  let dir = shader_trees()?;
  for name in ["a", "b", "c"] {
    write_file(dir.path(), &format!("slang/{}.slang", name), SLANG_TARGET)?;
    write_file(dir.path(), &format!("cg/{}.cg", name), MIT_SOURCE)?;
  }

  let output = headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--max-pairs", "2"])
    .output()?;

  assert!(output.status.success());
  let stdout = String::from_utf8(output.stdout)?;
  assert!(stdout.contains("Showing up to 2."));
  assert_eq!(stdout.matches("DIFF for target:").count(), 2);
  assert!(!stdout.contains("slang/c.slang"));
  Ok(())
}

#[test]
fn test_save_diff_writes_aggregate_patch() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "slang/b.slangp", "shaders = 1\n")?;
  write_file(dir.path(), "cg/b.cgp", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--save-diff", "tools/license_diffs_all.patch", "--max-diff-lines", "4"])
    .assert()
    .success()
    .stdout(predicate::str::contains("... (diff truncated) ..."));

  let patch = fs::read_to_string(dir.path().join("tools/license_diffs_all.patch"))?;
  assert_eq!(patch.matches("DIFF for target:").count(), 2);
  assert!(patch.contains("+++ slang/b.slangp"));
  assert!(patch.contains("+ * MIT License"));
  assert!(!patch.contains("truncated"));
  Ok(())
}

#[test]
fn test_apply_rewrites_and_commits() -> Result<()> {
  let dir = shader_trees()?;
  init_git_repo(dir.path())?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .arg("--apply")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "-- APPLIED: slang/a.slang  (backup at slang/a.slang.bak)",
    ))
    .stdout(predicate::str::contains("Committed 1 files"))
    .stdout(predicate::str::contains("+ * MIT License").not());

  assert_eq!(fs::read_to_string(&target)?, EXPECTED_APPLIED);
  assert_eq!(fs::read_to_string(dir.path().join("slang/a.slang.bak"))?, SLANG_TARGET);

  let (message, paths) = head_commit(dir.path())?;
  assert_eq!(
    message,
    "chore: copy license headers from common-shaders into slang-shaders for matched ports"
  );
  assert_eq!(paths, vec!["slang/a.slang".to_string()]);

  // A second run finds the header it just added.
  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .arg("--apply")
    .assert()
    .success()
    .stdout(predicate::str::contains("-- SKIP (target has license): slang/a.slang"));

  Ok(())
}

#[test]
fn test_apply_outside_repository_reports_commit_failure() -> Result<()> {
  let dir = shader_trees()?;
  let target = write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .arg("--apply")
    .assert()
    .success()
    .stderr(predicate::str::contains("git commit failed:"));

  assert_eq!(fs::read_to_string(&target)?, EXPECTED_APPLIED);
  Ok(())
}

#[test]
fn test_apply_with_no_commit() -> Result<()> {
  let dir = shader_trees()?;
  init_git_repo(dir.path())?;
  write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--apply", "--no-commit"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Committed").not());

  let repo = git2::Repository::open(dir.path())?;
  assert!(repo.head().is_err(), "no commit expected");
  Ok(())
}

#[test]
fn test_report_json() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/a.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;
  write_file(dir.path(), "slang/b.slang", "// Licensed under the MIT License\n")?;
  write_file(dir.path(), "cg/b.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--report-json", "report.json"])
    .assert()
    .success();

  let report: Value = serde_json::from_str(&fs::read_to_string(dir.path().join("report.json"))?)?;
  assert_eq!(report["summary"]["mode"], "generate");
  assert_eq!(report["summary"]["total_items"], 2);
  assert_eq!(report["summary"]["diffed"], 1);
  assert_eq!(report["summary"]["skipped"], 1);
  assert_eq!(report["items"][0]["target"], "slang/a.slang");
  assert_eq!(report["items"][0]["status"], "diffed");
  assert_eq!(report["items"][1]["status"], "target_licensed");
  Ok(())
}

#[test]
fn test_missing_source_root_fails() -> Result<()> {
  let dir = shader_trees()?;

  headerport(dir.path())?
    .arg("generate")
    .args(["--target-root", "slang", "--source-root", "does-not-exist"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does-not-exist"));

  Ok(())
}

#[test]
fn test_unique_only_skips_ambiguous_basenames() -> Result<()> {
  let dir = shader_trees()?;
  write_file(dir.path(), "slang/one/blur.slang", SLANG_TARGET)?;
  write_file(dir.path(), "slang/two/blur.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/blur.cg", MIT_SOURCE)?;
  write_file(dir.path(), "slang/sharp.slang", SLANG_TARGET)?;
  write_file(dir.path(), "cg/sharp.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 3 candidate pairs"));

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .arg("--unique-only")
    .assert()
    .success()
    .stdout(predicate::str::contains("Found 1 candidate pairs"))
    .stdout(predicate::str::contains("DIFF for target: slang/sharp.slang"));

  Ok(())
}

#[test]
fn test_apply_leaves_non_utf8_target_byte_for_byte() -> Result<()> {
  let dir = shader_trees()?;
  let original: &[u8] = b"#version 450\n// caf\xE9 shader\nlayout(location = 0) out vec4 FragColor;\n";
  let target = dir.path().join("slang/a.slang");
  fs::write(&target, original)?;
  write_file(dir.path(), "cg/a.cg", MIT_SOURCE)?;

  headerport(dir.path())?
    .arg("generate")
    .args(TREE_ARGS)
    .args(["--apply", "--no-commit"])
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "-- SKIP (target is not valid UTF-8): slang/a.slang  (left unchanged)",
    ))
    .stdout(predicate::str::contains("APPLIED").not());

  assert_eq!(fs::read(&target)?, original);
  assert!(!dir.path().join("slang/a.slang.bak").exists());
  Ok(())
}
