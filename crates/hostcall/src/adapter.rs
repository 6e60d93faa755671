//! The extension function adapter.
//!
//! A call moves through `AwaitingArgument → Computed`; any failure ends the
//! call in `Failed`. There is no retry and no partial result: the caller
//! either gets a freshly built `str` or the pending error and `NULL`.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString, PyTuple};

use crate::error::AdapterError;
use crate::marshal;
use crate::registry::Export;

/// Where a call is in the adapter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// The argument has not yet been unpacked and decoded.
    AwaitingArgument,
    /// The native function has run; the result is being encoded.
    Computed,
    /// The call was aborted. Terminal.
    Failed,
}

/// Run `export` against one call's arguments.
///
/// Unpacks the single `str` argument, decodes it, runs the native function
/// and encodes its output into a new `str`. The native function is never
/// called if unpacking or decoding fails.
pub fn invoke<'py>(
    export: &Export,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> Result<Bound<'py, PyString>, AdapterError> {
    let function = export.name();
    let mut state = CallState::AwaitingArgument;
    tracing::trace!(function, ?state, "invoke");

    match run(export, args, kwargs, &mut state) {
        Ok(out) => {
            tracing::trace!(function, ?state, "completed");
            Ok(out)
        }
        Err(err) => {
            let from = std::mem::replace(&mut state, CallState::Failed);
            tracing::debug!(function, ?from, ?state, kind = %err.kind(), error = %err, "call failed");
            Err(err)
        }
    }
}

fn run<'py>(
    export: &Export,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
    state: &mut CallState,
) -> Result<Bound<'py, PyString>, AdapterError> {
    let arg = marshal::unpack_single(export.name(), args, kwargs)?;
    let text = marshal::decode(&arg)?;
    let output = export.call(&text);
    *state = CallState::Computed;
    marshal::encode(args.py(), &output)
}

/// Adapter entry point used by registered functions.
///
/// Converts the result into what the pyo3 trampoline hands back to CPython:
/// an owned `str`, or a [`PyErr`] that is restored as the pending error while
/// `NULL` is returned.
pub(crate) fn call(
    export: &Export,
    args: &Bound<'_, PyTuple>,
    kwargs: Option<&Bound<'_, PyDict>>,
) -> PyResult<Py<PyString>> {
    invoke(export, args, kwargs)
        .map(Bound::unbind)
        .map_err(PyErr::from)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{ArgumentError, ErrorKind};
    use crate::scope::live_intermediates;

    fn bracket(text: &str) -> String {
        format!("[{text}]")
    }

    static BRACKET: Export = Export::new(c"bracket", c"bracket(text, /)", bracket);

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counted(text: &str) -> String {
        CALLS.fetch_add(1, Ordering::SeqCst);
        text.to_owned()
    }

    static COUNTED: Export = Export::new(c"counted", c"counted(text, /)", counted);

    fn echo(text: &str) -> String {
        text.to_owned()
    }

    static ECHO: Export = Export::new(c"echo", c"echo(text, /)", echo);

    #[test]
    fn invoke_applies_native_function() {
        Python::attach(|py| {
            let args = PyTuple::new(py, ["hello"]).unwrap();
            let out = invoke(&BRACKET, &args, None).unwrap();
            assert_eq!(out.to_string(), "[hello]");
        });
    }

    #[test]
    fn invoke_handles_empty_string() {
        Python::attach(|py| {
            let args = PyTuple::new(py, [""]).unwrap();
            let out = invoke(&BRACKET, &args, None).unwrap();
            assert_eq!(out.to_string(), "[]");
        });
    }

    #[test]
    fn invoke_never_calls_native_function_on_failure() {
        Python::attach(|py| {
            let before = CALLS.load(Ordering::SeqCst);

            let two = PyTuple::new(py, ["a", "b"]).unwrap();
            assert!(invoke(&COUNTED, &two, None).is_err());

            let surrogate = py.eval(c"'\\ud800'", None, None).unwrap();
            let args = PyTuple::new(py, [surrogate]).unwrap();
            let err = invoke(&COUNTED, &args, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decoding);

            assert_eq!(CALLS.load(Ordering::SeqCst), before);
        });
    }

    #[test]
    fn call_maps_errors_to_python_exceptions() {
        Python::attach(|py| {
            let empty = PyTuple::empty(py);
            let err = call(&BRACKET, &empty, None).unwrap_err();
            assert!(err.is_instance_of::<ArgumentError>(py));
        });
    }

    #[test]
    fn result_is_never_the_input_object() {
        Python::attach(|py| {
            let input = PyString::new(py, "identity check");
            let args = PyTuple::new(py, [input.clone()]).unwrap();
            let out = invoke(&ECHO, &args, None).unwrap();
            assert_eq!(out.to_string(), "identity check");
            assert_ne!(out.as_ptr(), input.as_ptr());
        });
    }

    #[test]
    fn repeated_calls_release_every_intermediate() {
        Python::attach(|py| {
            let input = PyString::new(py, "héllo 🦀");
            let args = PyTuple::new(py, [input.clone()]).unwrap();
            let refcnt = input.get_refcnt();
            let before = live_intermediates();

            for _ in 0..1_000 {
                let out = invoke(&BRACKET, &args, None).unwrap();
                assert_eq!(out.get_refcnt(), 1);
            }

            assert_eq!(live_intermediates(), before);
            assert_eq!(input.get_refcnt(), refcnt);
        });
    }
}
