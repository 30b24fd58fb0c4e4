use std::path::PathBuf;

use anyhow::{Context, Result};

use issuedigest_core::patch::{LiteralPatch, PatchOutcome};

#[derive(Debug)]
pub struct PatchInputs {
    pub target: PathBuf,
    pub anchor: String,
    pub insert: String,
    pub dry_run: bool,
}

pub fn execute(inputs: PatchInputs) -> Result<()> {
    let patch = LiteralPatch::new(inputs.target, inputs.anchor, inputs.insert);
    let outcome = patch
        .apply(inputs.dry_run)
        .with_context(|| format!("patch {}", patch.target.display()))?;

    match outcome {
        PatchOutcome::Applied { offset } if inputs.dry_run => {
            println!(
                "Would insert {} bytes at offset {offset} in {}",
                patch.insertion.len(),
                patch.target.display()
            );
        }
        PatchOutcome::Applied { .. } => {
            println!("Successfully patched {}", patch.target.display());
        }
        PatchOutcome::AlreadyApplied => {
            println!("Patch already present in {}", patch.target.display());
        }
    }
    Ok(())
}
