//! Static export tables.
//!
//! An extension crate lists its functions in a `static` [`ExportTable`]. The
//! table is built at compile time, never mutated, and registered into the
//! Python module once, from the module initialiser.

use std::collections::HashSet;
use std::ffi::CStr;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyCFunction;

use crate::adapter;

/// A native string function that can be exported.
///
/// Must be total: every input, including `""`, produces an output.
pub type NativeFn = fn(&str) -> String;

/// One exported function: its Python name, docstring and native body.
#[derive(Clone, Copy)]
pub struct Export {
    name: &'static CStr,
    doc: &'static CStr,
    func: NativeFn,
}

impl Export {
    /// Declare an export.
    ///
    /// `doc` may start with a `name(args, /)\n--\n\n` signature line, which
    /// CPython exposes as `__text_signature__`.
    pub const fn new(name: &'static CStr, doc: &'static CStr, func: NativeFn) -> Self {
        Self { name, doc, func }
    }

    /// The exported Python name.
    pub fn name(&self) -> &'static str {
        self.name.to_str().unwrap_or("<invalid name>")
    }

    /// The docstring attached to the Python function.
    pub fn doc(&self) -> &'static CStr {
        self.doc
    }

    /// Run the native function directly, bypassing the interpreter.
    pub fn call(&self, text: &str) -> String {
        (self.func)(text)
    }
}

impl std::fmt::Debug for Export {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Export")
            .field("name", &self.name)
            .field("func", &"<native fn>")
            .finish_non_exhaustive()
    }
}

/// An immutable mapping from exported name to adapter function.
#[derive(Debug, Clone, Copy)]
pub struct ExportTable {
    exports: &'static [Export],
}

impl ExportTable {
    /// Wrap a static list of exports.
    pub const fn new(exports: &'static [Export]) -> Self {
        Self { exports }
    }

    /// Look up an export by its Python name.
    pub fn get(&self, name: &str) -> Option<&'static Export> {
        self.exports.iter().find(|export| export.name() == name)
    }

    /// Iterate over the exports in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'static, Export> {
        self.exports.iter()
    }

    /// Exported names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Export::name).collect()
    }

    /// Number of exports.
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// Whether the table exports nothing.
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    /// Check that every name is valid UTF-8 and appears only once.
    pub fn validate(&self) -> PyResult<()> {
        let mut seen = HashSet::with_capacity(self.exports.len());
        for export in self.exports {
            let name = export.name.to_str().map_err(|e| {
                PyValueError::new_err(format!("export name {:?} is not UTF-8: {e}", export.name))
            })?;
            if !seen.insert(name) {
                return Err(PyValueError::new_err(format!(
                    "export '{name}' is declared more than once"
                )));
            }
        }
        Ok(())
    }

    /// Add every export to `module` as a callable bound to the adapter.
    ///
    /// Called once from the module initialiser.
    pub fn register(&self, module: &Bound<'_, PyModule>) -> PyResult<()> {
        self.validate()?;
        let py = module.py();

        for export in self.iter().copied() {
            let function = PyCFunction::new_closure(
                py,
                Some(export.name),
                Some(export.doc),
                move |args, kwargs| adapter::call(&export, args, kwargs),
            )?;
            module.add(export.name(), function)?;
            tracing::debug!(function = export.name(), "registered export");
        }
        Ok(())
    }
}
