//! Conversions between interpreter objects and native strings.

use pyo3::exceptions::{PyMemoryError, PyUnicodeDecodeError};
use pyo3::ffi;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString, PyTuple};

use crate::error::AdapterError;
use crate::scope::Scoped;

/// Extract the single positional `str` argument of a call.
///
/// `function` is the exported name used in error messages. Any keyword
/// argument is rejected; an empty keyword dict is treated as no keywords.
pub fn unpack_single<'py>(
    function: &'static str,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> Result<Bound<'py, PyString>, AdapterError> {
    if kwargs.is_some_and(|kw| !kw.is_empty()) {
        return Err(AdapterError::Keywords { function });
    }

    let given = args.len();
    if given != 1 {
        return Err(AdapterError::Arity { function, given });
    }

    let arg = args
        .get_item(0)
        .map_err(|_| AdapterError::Arity { function, given })?;

    match arg.downcast_into::<PyString>() {
        Ok(text) => Ok(text),
        Err(err) => {
            let type_name = err
                .into_inner()
                .get_type()
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|_| "object".to_string());
            Err(AdapterError::NotAString {
                function,
                type_name,
            })
        }
    }
}

/// Decode a `str` into an owned native string.
///
/// The text goes through an intermediate UTF-8 `bytes` object, which is held
/// by a [`Scoped`] guard and released before this function returns on every
/// path.
pub fn decode(text: &Bound<'_, PyString>) -> Result<String, AdapterError> {
    let encoded = Scoped::acquire(
        text.encode_utf8().map_err(AdapterError::Decoding)?,
        "utf8-bytes",
    );
    let bytes = encoded.as_bytes();

    match std::str::from_utf8(bytes) {
        Ok(native) => Ok(native.to_owned()),
        Err(utf8_err) => {
            let err = match PyUnicodeDecodeError::new_utf8(text.py(), bytes, utf8_err) {
                Ok(exc) => PyErr::from_value(exc.into_any()),
                Err(err) => err,
            };
            Err(AdapterError::Decoding(err))
        }
    }
}

/// Construct a new `str` holding `text`.
///
/// The result is always a freshly allocated object. A `NULL` from the
/// interpreter becomes [`AdapterError::Allocation`] carrying its pending error.
#[allow(unsafe_code)]
pub fn encode<'py>(py: Python<'py>, text: &str) -> Result<Bound<'py, PyString>, AdapterError> {
    let len = ffi::Py_ssize_t::try_from(text.len()).map_err(|_| {
        AdapterError::Allocation(PyMemoryError::new_err(format!(
            "result of {} bytes exceeds Py_ssize_t",
            text.len()
        )))
    })?;

    // SAFETY: `text` is valid UTF-8 of exactly `len` bytes and the GIL is held
    // via `py`. The returned pointer is a new (owned) reference or NULL with
    // an exception set, which `from_owned_ptr_or_err` handles.
    let obj = unsafe {
        Bound::from_owned_ptr_or_err(
            py,
            ffi::PyUnicode_FromStringAndSize(text.as_ptr().cast(), len),
        )
    }
    .map_err(AdapterError::Allocation)?;

    // SAFETY: PyUnicode_FromStringAndSize returns a `str` on success.
    Ok(unsafe { obj.downcast_into_unchecked::<PyString>() })
}
