//! The `greet` Python extension module.
//!
//! ```python
//! import greet
//!
//! greet.hello("world")  # "Hello, world"
//! ```

use hostcall::{Export, ExportTable};
use pyo3::prelude::*;

/// Prefix prepended to every name.
pub const GREETING: &str = "Hello, ";

/// Prepend [`GREETING`] to `name`.
pub fn hello(name: &str) -> String {
    format!("{GREETING}{name}")
}

/// Functions exported by the `greet` module.
pub static EXPORTS: ExportTable = ExportTable::new(&[Export::new(
    c"hello",
    c"hello(name, /)\n--\n\nReturn a greeting for name.",
    hello,
)]);

#[pymodule]
fn greet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    EXPORTS.register(m)?;
    hostcall::add_module_attributes(m, &EXPORTS, env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_prepends_greeting() {
        assert_eq!(hello("world"), "Hello, world");
        assert_eq!(hello(""), "Hello, ");
    }

    fn hello_fn(py: Python<'_>) -> Bound<'_, PyAny> {
        let m = PyModule::new(py, "greet").unwrap();
        greet(&m).unwrap();
        m.getattr("hello").unwrap()
    }

    #[test]
    fn module_greets_from_python() {
        Python::attach(|py| {
            let out: String = hello_fn(py).call1(("world",)).unwrap().extract().unwrap();
            assert_eq!(out, "Hello, world");

            let out: String = hello_fn(py).call1(("Zoë 🌍",)).unwrap().extract().unwrap();
            assert_eq!(out, "Hello, Zoë 🌍");
        });
    }

    #[test]
    fn empty_name_still_greets() {
        Python::attach(|py| {
            let out: String = hello_fn(py).call1(("",)).unwrap().extract().unwrap();
            assert_eq!(out, GREETING);
        });
    }

    #[test]
    fn wrong_arity_raises_argument_error() {
        Python::attach(|py| {
            let err = hello_fn(py).call0().unwrap_err();
            assert!(err.is_instance_of::<hostcall::ArgumentError>(py));
            assert_eq!(
                err.value(py).to_string(),
                "hello() takes exactly one argument (0 given)"
            );

            let err = hello_fn(py).call1(("a", "b")).unwrap_err();
            assert!(err.is_instance_of::<hostcall::ArgumentError>(py));
        });
    }

    #[test]
    fn non_string_raises_argument_error() {
        Python::attach(|py| {
            let err = hello_fn(py).call1((None::<i32>,)).unwrap_err();
            assert_eq!(
                err.value(py).to_string(),
                "hello() argument must be str, not NoneType"
            );
        });
    }
}
