//! Implementation of `implreg render`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::format::{self, RenderOptions};
use crate::ops::load_table_json;
use crate::util::fs::write_string;

/// Options for rendering a table into a fragment script.
#[derive(Debug, Clone)]
pub struct RenderFileOptions {
    /// JSON table to render
    pub input: PathBuf,

    /// Where to write the script (None = return only)
    pub output: Option<PathBuf>,

    /// Append the segment offset trailer
    pub emit_offsets: bool,
}

/// Render a JSON table as a fragment script, writing it if asked.
pub fn render_table_file(opts: &RenderFileOptions) -> Result<String> {
    let table = load_table_json(&opts.input)?;
    tracing::debug!(
        "rendering {} librar(ies), {} implementor(s)",
        table.len(),
        table.total_entries()
    );

    let rendered = format::render(
        &table,
        RenderOptions {
            emit_offsets: opts.emit_offsets,
        },
    )
    .with_context(|| format!("failed to render {}", opts.input.display()))?;

    if let Some(ref output) = opts.output {
        write_string(output, &rendered)?;
        tracing::info!("Wrote {}", output.display());
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_table_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("table.json");
        std::fs::write(&input, r#"{"libB":[["y"],["z"]],"libA":[["x"]]}"#).unwrap();
        let output = tmp.path().join("doc/trait.impl/core/convert/trait.From.js");

        let rendered = render_table_file(&RenderFileOptions {
            input,
            output: Some(output.clone()),
            emit_offsets: true,
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), rendered);
        assert!(rendered.contains(r#"[["libA",[["x"]]],["libB",[["y"],["z"]]]]"#));
        assert!(rendered.lines().last().unwrap().starts_with("//{\"start\":57"));
    }

    #[test]
    fn test_render_rejects_bad_table() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("table.json");
        std::fs::write(&input, r#"{"libA":"x"}"#).unwrap();

        let result = render_table_file(&RenderFileOptions {
            input,
            output: None,
            emit_offsets: true,
        });
        assert!(result.is_err());
    }
}
