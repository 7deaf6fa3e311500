//! `implreg scan` command

use anyhow::Result;

use crate::cli::ScanArgs;
use implreg::ops::scan;
use implreg::util::diagnostic::{self, suggestions, Diagnostic};

pub fn execute(args: ScanArgs, color: bool) -> Result<()> {
    let found = scan(&args.doc_root)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        let diag = Diagnostic::warning("no implementor fragments found")
            .with_location(&args.doc_root)
            .with_suggestion(suggestions::NO_FRAGMENTS);
        diagnostic::emit(&diag, color);
        return Ok(());
    }

    for fragment in &found {
        match fragment.error {
            Some(ref error) => println!("{}  (unreadable: {})", fragment.trait_path, error),
            None => println!(
                "{}  {} librar(ies), {} implementor(s)  {}",
                fragment.trait_path,
                fragment.libraries,
                fragment.entries,
                fragment.path.display()
            ),
        }
    }

    Ok(())
}
