#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use git2::Repository;
use tempfile::{TempDir, tempdir};

/// MIT header written as `//` comments, followed by code.
pub const MIT_SOURCE: &str = "\
// Copyright (c) 2015 Jane Doe
// Permission is hereby granted, free of charge, to any person obtaining a copy
// MIT License

float4 main_fragment() : COLOR { return 0; }
";

/// Block comment holding only compatibility notes.
pub const COMPAT_ONLY_SOURCE: &str = "\
/* Compatibility with HLSL and Cg compilers
 - tex2D wrapper
 */
float4 main_fragment() : COLOR { return 0; }
";

/// Slang target with a directive prelude and no license.
pub const SLANG_TARGET: &str = "#version 450\n\nlayout(location = 0) out vec4 FragColor;\n";

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// A scratch directory with an empty `slang/` target tree and `cg/` source
/// tree.
pub fn shader_trees() -> Result<TempDir> {
  let dir = tempdir()?;
  fs::create_dir_all(dir.path().join("slang"))?;
  fs::create_dir_all(dir.path().join("cg"))?;
  Ok(dir)
}

/// Initializes a git repository with a deterministic identity.
pub fn init_git_repo(dir: &Path) -> Result<Repository> {
  let repo = Repository::init(dir).context("Failed to init repository")?;
  {
    let mut config = repo.config().context("Failed to open repository config")?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;
    config.set_bool("commit.gpgsign", false)?;
  }
  Ok(repo)
}

/// Message and changed paths of the `HEAD` commit.
pub fn head_commit(dir: &Path) -> Result<(String, Vec<String>)> {
  let repo = Repository::open(dir)?;
  let commit = repo.head()?.peel_to_commit()?;
  let message = commit.message().unwrap_or_default().to_string();

  let mut paths = Vec::new();
  commit.tree()?.walk(git2::TreeWalkMode::PreOrder, |root, entry| {
    if entry.kind() == Some(git2::ObjectType::Blob) {
      paths.push(format!("{}{}", root, entry.name().unwrap_or_default()));
    }
    git2::TreeWalkResult::Ok
  })?;
  paths.sort();

  Ok((message, paths))
}

/// The headerport binary running in `dir` with config discovery and colors
/// off.
pub fn headerport(dir: &Path) -> Result<Command> {
  let mut cmd = Command::cargo_bin("headerport")?;
  cmd
    .current_dir(dir)
    .env_remove("HEADERPORT_CONFIG")
    .env_remove("RUST_LOG")
    .arg("--no-config")
    .arg("--colors=never");
  Ok(cmd)
}

/// Arguments pointing `generate` at the `slang/` and `cg/` trees.
pub const TREE_ARGS: &[&str] = &["--target-root", "slang", "--source-root", "cg"];
