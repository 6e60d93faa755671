//! The `redtext` Python extension module.
//!
//! ```python
//! import redtext
//!
//! print(redtext.colorize("error"))  # "error" in red on ANSI terminals
//! ```

use hostcall::{Export, ExportTable};
use pyo3::prelude::*;

/// ANSI escape selecting a red foreground.
pub const RED: &str = "\x1b[31m";

/// ANSI escape resetting all attributes.
pub const RESET: &str = "\x1b[0m";

/// Wrap `text` in the red color escape and the reset escape.
pub fn colorize(text: &str) -> String {
    let mut out = String::with_capacity(RED.len() + text.len() + RESET.len());
    out.push_str(RED);
    out.push_str(text);
    out.push_str(RESET);
    out
}

/// Functions exported by the `redtext` module.
pub static EXPORTS: ExportTable = ExportTable::new(&[Export::new(
    c"colorize",
    c"colorize(text, /)\n--\n\nReturn text wrapped in ANSI escape codes that color it red.",
    colorize,
)]);

#[pymodule]
fn redtext(m: &Bound<'_, PyModule>) -> PyResult<()> {
    EXPORTS.register(m)?;
    hostcall::add_module_attributes(m, &EXPORTS, env!("CARGO_PKG_VERSION"))
}
