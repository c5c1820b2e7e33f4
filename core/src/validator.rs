//! Script readability checks
//!
//! Two checks exist and are deliberately kept apart:
//! - [`script_open`] validates only the leading token of a reference, so a
//!   per-state script may carry embedded arguments.
//! - [`script_open_literal`] validates the whole reference as one path. A
//!   generic script with embedded arguments fails this check even though the
//!   command builder would quote and pass it on as `"path args"`.

use std::fs::File;
use tracing::{debug, info};

/// `isspace` in the C locale, which includes vertical tab
fn is_c_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Leading run of non-whitespace characters of a script reference
pub fn script_name(reference: &str) -> &str {
    let end = reference.find(is_c_space).unwrap_or(reference.len());
    &reference[..end]
}

/// Open `path` exactly as given for reading, closing it straight away
pub fn script_open_literal(path: &str) -> bool {
    match File::open(path) {
        Ok(_file) => true,
        Err(e) => {
            info!(
                script = %path,
                errno = e.raw_os_error().unwrap_or(0),
                error = %e,
                "Can't open script"
            );
            false
        }
    }
}

/// Open the leading token of `reference`, ignoring embedded arguments
pub fn script_open(reference: &str) -> bool {
    let name = script_name(reference);
    if name.is_empty() {
        debug!(reference = %reference, "Script reference has no path");
        return false;
    }
    script_open_literal(name)
}
