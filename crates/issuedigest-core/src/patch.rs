use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::PatchError;

/// A literal edit: insert `insertion` right after the first `anchor`.
#[derive(Debug, Clone)]
pub struct LiteralPatch {
    pub target: PathBuf,
    pub anchor: String,
    pub insertion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied { offset: usize },
    AlreadyApplied,
}

impl LiteralPatch {
    pub fn new(target: PathBuf, anchor: impl Into<String>, insertion: impl Into<String>) -> Self {
        Self {
            target,
            anchor: anchor.into(),
            insertion: insertion.into(),
        }
    }

    /// Returns the patched text, or `None` when the insertion already follows the anchor.
    pub fn splice(&self, contents: &str) -> Result<Option<(usize, String)>, PatchError> {
        if self.anchor.is_empty() {
            return Err(PatchError::EmptyAnchor);
        }
        let start = contents
            .find(&self.anchor)
            .ok_or_else(|| PatchError::AnchorNotFound {
                path: self.target.clone(),
            })?;
        let offset = start + self.anchor.len();
        if contents[offset..].starts_with(&self.insertion) {
            return Ok(None);
        }

        let mut patched = String::with_capacity(contents.len() + self.insertion.len());
        patched.push_str(&contents[..offset]);
        patched.push_str(&self.insertion);
        patched.push_str(&contents[offset..]);
        Ok(Some((offset, patched)))
    }

    pub fn apply(&self, dry_run: bool) -> Result<PatchOutcome, PatchError> {
        let contents = read_target(&self.target)?;
        let Some((offset, patched)) = self.splice(&contents)? else {
            debug!("patch already present in {}", self.target.display());
            return Ok(PatchOutcome::AlreadyApplied);
        };

        if dry_run {
            debug!("dry run, leaving {} untouched", self.target.display());
        } else {
            fs::write(&self.target, patched).map_err(|source| PatchError::Io {
                path: self.target.clone(),
                source,
            })?;
            debug!(
                "inserted {} bytes at offset {offset} in {}",
                self.insertion.len(),
                self.target.display()
            );
        }
        Ok(PatchOutcome::Applied { offset })
    }
}

fn read_target(path: &Path) -> Result<String, PatchError> {
    fs::read_to_string(path).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })
}
