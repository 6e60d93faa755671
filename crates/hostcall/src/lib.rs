//! # hostcall
//!
//! Expose native Rust string functions to CPython as extension functions.
//!
//! An extension crate declares its functions once, in a static [`ExportTable`],
//! and registers that table from its `#[pymodule]` initialiser. Every call from
//! Python then flows through the same adapter pipeline:
//!
//! 1. **Unpack** the positional argument tuple into exactly one `str`.
//! 2. **Decode** it through an intermediate UTF-8 `bytes` object into a `String`.
//! 3. **Compute** the native `fn(&str) -> String`.
//! 4. **Encode** the output into a freshly allocated `str`.
//!
//! Intermediate host objects are owned by scope guards (see [`scope`]) and are
//! released exactly once on every exit path. Failures surface through
//! CPython's error indicator as [`ArgumentError`], the original `UnicodeError`,
//! or the original allocation error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostcall::{Export, ExportTable};
//! use pyo3::prelude::*;
//!
//! fn shout(text: &str) -> String {
//!     text.to_uppercase()
//! }
//!
//! static EXPORTS: ExportTable = ExportTable::new(&[Export::new(
//!     c"shout",
//!     c"shout(text, /)\n--\n\nReturn text in upper case.",
//!     shout,
//! )]);
//!
//! #[pymodule]
//! fn loud(m: &Bound<'_, PyModule>) -> PyResult<()> {
//!     EXPORTS.register(m)
//! }
//! ```
//!
//! ## Safety
//!
//! The crate uses `#![deny(unsafe_code)]`. It is allowed only for the raw
//! CPython call that builds result strings in [`marshal`], and for the trait
//! impls generated by `create_exception!`.

#![deny(unsafe_code)]

pub mod adapter;
// create_exception! expands to unsafe trait impls.
#[allow(unsafe_code)]
mod error;
pub mod marshal;
mod registry;
pub mod scope;

pub use adapter::{CallState, invoke};
pub use error::{AdapterError, ArgumentError, ErrorKind};
pub use registry::{Export, ExportTable, NativeFn};

use pyo3::prelude::*;

/// Add the shared module attributes every extension module carries.
///
/// Sets `ArgumentError`, `__version__` and `__all__` on `module`. `version` is
/// usually `env!("CARGO_PKG_VERSION")` of the extension crate.
pub fn add_module_attributes(
    module: &Bound<'_, PyModule>,
    exports: &ExportTable,
    version: &str,
) -> PyResult<()> {
    let py = module.py();
    module.add("ArgumentError", py.get_type::<ArgumentError>())?;
    module.add("__version__", version)?;
    module.add("__all__", exports.names())?;
    Ok(())
}
