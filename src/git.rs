//! # Git Module
//!
//! Stages and commits the files rewritten by a batch, using libgit2 so no
//! `git` binary is required.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use git2::{Commit, ErrorCode, Oid, Repository};
use tracing::debug;

use crate::verbose_log;

/// Commit message used when none is configured.
pub const DEFAULT_COMMIT_MESSAGE: &str =
  "chore: copy license headers from common-shaders into slang-shaders for matched ports";

/// Stages `paths` and commits them on `HEAD` with `message`.
///
/// The repository is discovered from the first path; every path must live
/// in its work tree. The author and committer come from the repository's
/// git configuration. Works on a repository without any commit yet.
///
/// # Errors
///
/// Returns an error if:
/// - `paths` is empty
/// - no repository contains the paths
/// - a path lies outside the work tree
/// - no `user.name`/`user.email` is configured
/// - writing the index, tree or commit fails
pub fn stage_and_commit(paths: &[PathBuf], message: &str) -> Result<Oid> {
  let Some(first) = paths.first() else {
    bail!("No files to commit");
  };

  let first = absolutize(first)?;
  let start = first.parent().unwrap_or(&first);
  let repo = Repository::discover(start)
    .with_context(|| format!("Failed to find git repository for {}", first.display()))?;
  let workdir = repo
    .workdir()
    .context("Git repository has no working directory")?
    .canonicalize()
    .context("Failed to resolve git working directory")?;

  let mut index = repo.index().context("Failed to open git index")?;
  for path in paths {
    let absolute = absolutize(path)?
      .canonicalize()
      .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let relative = absolute
      .strip_prefix(&workdir)
      .with_context(|| format!("{} is outside the repository at {}", path.display(), workdir.display()))?;
    verbose_log!("Staging {}", relative.display());
    index
      .add_path(relative)
      .with_context(|| format!("Failed to stage {}", relative.display()))?;
  }
  index.write().context("Failed to write git index")?;

  let tree_id = index.write_tree().context("Failed to write git tree")?;
  let tree = repo.find_tree(tree_id).context("Failed to find written tree")?;
  let signature = repo
    .signature()
    .context("Failed to determine commit author (set user.name and user.email)")?;

  let parent = head_commit(&repo)?;
  let parents: Vec<&Commit<'_>> = parent.iter().collect();

  let oid = repo
    .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
    .context("Failed to create commit")?;

  debug!("Created commit {} with {} files", oid, paths.len());
  Ok(oid)
}

/// Returns the commit `HEAD` points at, or `None` on an unborn branch.
fn head_commit(repo: &Repository) -> Result<Option<Commit<'_>>> {
  match repo.head() {
    Ok(head) => Ok(Some(head.peel_to_commit().context("Failed to get HEAD commit")?)),
    Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
    Err(e) => Err(e).context("Failed to get HEAD reference"),
  }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}
