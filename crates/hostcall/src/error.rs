//! Error types for the extension function adapter.

use pyo3::PyErr;
use pyo3::exceptions::PyTypeError;

pyo3::create_exception!(
    hostcall,
    ArgumentError,
    PyTypeError,
    "Raised when an extension function is called with the wrong number or type of arguments."
);

/// The three failure classes an adapter call can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong argument count, keyword arguments, or a non-`str` argument.
    Argument,
    /// The argument could not be represented as UTF-8.
    Decoding,
    /// The result string could not be constructed.
    Allocation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Argument => "ArgumentError",
            Self::Decoding => "DecodingError",
            Self::Allocation => "AllocationError",
        })
    }
}

/// Errors that abort an adapter call.
///
/// None of these are retried. Converting into [`PyErr`] sets the error that
/// CPython observes when the adapter returns its `NULL` sentinel.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Keyword arguments were supplied to a positional-only function.
    #[error("{function}() takes no keyword arguments")]
    Keywords {
        /// Exported name of the function that was called.
        function: &'static str,
    },

    /// The positional argument count was not exactly one.
    #[error("{function}() takes exactly one argument ({given} given)")]
    Arity {
        /// Exported name of the function that was called.
        function: &'static str,
        /// Number of positional arguments actually supplied.
        given: usize,
    },

    /// The single argument was not a `str`.
    #[error("{function}() argument must be str, not {type_name}")]
    NotAString {
        /// Exported name of the function that was called.
        function: &'static str,
        /// Python type name of the offending argument.
        type_name: String,
    },

    /// The argument could not be encoded to, or decoded from, UTF-8.
    ///
    /// Carries the interpreter's own exception so it reaches the caller unchanged.
    #[error("failed to decode argument as UTF-8: {0}")]
    Decoding(#[source] PyErr),

    /// The interpreter failed to allocate the result string.
    #[error("failed to construct result string: {0}")]
    Allocation(#[source] PyErr),
}

impl AdapterError {
    /// Which class of the error taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Keywords { .. } | Self::Arity { .. } | Self::NotAString { .. } => {
                ErrorKind::Argument
            }
            Self::Decoding(_) => ErrorKind::Decoding,
            Self::Allocation(_) => ErrorKind::Allocation,
        }
    }
}

impl From<AdapterError> for PyErr {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Decoding(inner) | AdapterError::Allocation(inner) => inner,
            other => ArgumentError::new_err(other.to_string()),
        }
    }
}
