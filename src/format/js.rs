//! The `trait.impl/**.js` script format.
//!
//! A rendered file looks like this (one fragment per library, sorted):
//!
//! ```text
//! (function() {
//!     var implementors = Object.fromEntries([["lib_a",[["impl ..."]]],["lib_b",[["impl ..."]]]]);
//!     if (window.register_implementors) {
//!         window.register_implementors(implementors);
//!     } else {
//!         window.pending_implementors = implementors;
//!     }
//! })()
//! //{"start":57,"fragment_lengths":[30,31]}
//! ```

use serde::de::IgnoredAny;

use crate::core::{FragmentTable, Implementor};
use crate::format::offsets::split_trailer;
use crate::format::{FragmentError, FragmentTemplate};

/// Script text up to and including the opening `[` of the payload.
pub const BEFORE: &str = "(function() {\n    var implementors = Object.fromEntries([";

/// Script text from the closing `]` of the payload onwards.
pub const AFTER: &str = "]);
    if (window.register_implementors) {
        window.register_implementors(implementors);
    } else {
        window.pending_implementors = implementors;
    }
})()";

const PAYLOAD_CALL: &str = "Object.fromEntries(";

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Append the segment offset trailer.
    pub emit_offsets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { emit_offsets: true }
    }
}

/// A parsed fragment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    /// The table the script registers.
    pub table: FragmentTable,
    /// Raw text of the trailer comment, without the leading `//`.
    pub trailer: Option<String>,
}

/// Serialize one library's segment.
fn fragment_for(library_id: &str, entries: &[Implementor]) -> Result<String, FragmentError> {
    serde_json::to_string(&(library_id, entries)).map_err(FragmentError::MalformedTable)
}

/// Library a serialized segment belongs to.
fn fragment_library(fragment: &str) -> Option<String> {
    serde_json::from_str::<(String, IgnoredAny)>(fragment)
        .ok()
        .map(|(library, _)| library)
}

/// Render a table as a fragment script.
///
/// Libraries are written sorted by identifier; entry order is kept.
pub fn render(table: &FragmentTable, opts: RenderOptions) -> Result<String, FragmentError> {
    let mut template = FragmentTemplate::new(BEFORE, AFTER);
    for (library_id, entries) in table.iter() {
        template.append(fragment_for(library_id, entries)?);
    }

    if opts.emit_offsets {
        Ok(template.to_string())
    } else {
        Ok(template.render_body())
    }
}

/// Parse a fragment script.
///
/// Whitespace around the payload is tolerated, so hand-edited or
/// reformatted scripts parse as long as the payload is intact. The trailer
/// is kept verbatim and not interpreted.
pub fn parse(src: &str) -> Result<FragmentFile, FragmentError> {
    let start = src
        .find(PAYLOAD_CALL)
        .ok_or(FragmentError::MissingWrapper)?
        + PAYLOAD_CALL.len();
    let payload = &src[start..];

    let mut stream = serde_json::Deserializer::from_str(payload).into_iter::<FragmentTable>();
    let table = match stream.next() {
        Some(Ok(table)) => table,
        Some(Err(e)) => return Err(FragmentError::MalformedTable(e)),
        None => return Err(FragmentError::MissingWrapper),
    };

    let rest = &payload[stream.byte_offset()..];
    if !rest.trim_start().starts_with(')') {
        return Err(FragmentError::MissingWrapper);
    }

    let trailer = split_trailer(src).map(|(_, trailer)| trailer.to_string());

    Ok(FragmentFile { table, trailer })
}

/// Splice a table into an existing canonical fragment script.
///
/// Each library in `table` replaces that library's segment; a library with
/// no entries is removed. Segments of other libraries are left as they are.
pub fn merge(existing: &str, table: &FragmentTable) -> Result<String, FragmentError> {
    let mut template: FragmentTemplate = existing.parse()?;

    for (library_id, entries) in table.iter() {
        template.retain(|fragment| fragment_library(fragment).as_deref() != Some(library_id));
        if entries.is_empty() {
            tracing::debug!("removing `{}` from fragment", library_id);
            continue;
        }
        template.append(fragment_for(library_id, entries)?);
    }

    Ok(template.to_string())
}
