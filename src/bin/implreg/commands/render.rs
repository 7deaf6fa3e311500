//! `implreg render` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::RenderArgs;
use implreg::ops::{render_table_file, RenderFileOptions};
use implreg::TraitPath;

pub fn execute(args: RenderArgs) -> Result<()> {
    let config = super::load_config()?;

    let output = match args.trait_path {
        Some(ref trait_path) => {
            let trait_path: TraitPath = trait_path
                .parse()
                .with_context(|| format!("invalid trait path: {}", trait_path))?;
            let doc_root = args.doc_root.unwrap_or_else(|| PathBuf::from("."));
            Some(doc_root.join(trait_path.fragment_path()))
        }
        None => args.output,
    };
    let to_stdout = output.is_none();

    let opts = RenderFileOptions {
        input: args.input,
        output,
        emit_offsets: !args.no_offsets && config.emit_offsets(),
    };

    let rendered = render_table_file(&opts)?;
    if to_stdout {
        print!("{}", rendered);
    }

    Ok(())
}
