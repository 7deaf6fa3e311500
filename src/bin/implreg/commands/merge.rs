//! `implreg merge` command

use anyhow::Result;

use crate::cli::MergeArgs;
use implreg::ops::merge_files;

pub fn execute(args: MergeArgs) -> Result<()> {
    let summary = merge_files(&args.target, &args.inputs)?;

    let verb = if summary.created { "Created" } else { "Updated" };
    eprintln!(
        "     {} {} ({} librar(ies) merged)",
        verb,
        summary.target.display(),
        summary.libraries.len()
    );

    Ok(())
}
