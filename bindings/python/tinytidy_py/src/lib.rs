//! Python bindings for TinyTidy.
//!
//! This crate provides the `tinytidy` extension module using PyO3.

use pyo3::create_exception;
use pyo3::exceptions::{
    PyException, PyKeyError, PyMemoryError, PyRuntimeError, PyTypeError, PyValueError,
};
use pyo3::prelude::*;
use pyo3::sync::GILOnceCell;
use pyo3::types::{PyBool, PyBytes, PyDict, PyInt, PyMapping, PyString, PyTuple, PyType};
use tinytidy_core::{OptionTable, OptionValue, OptionsArg, TidyError};

/// Library version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

create_exception!(tinytidy, TinyTidyError, PyException, "Base class of tinytidy errors.");

/// Error classes deriving from both `TinyTidyError` and a builtin.
struct ErrorTypes {
    invalid_argument: Py<PyType>,
    unknown_option: Py<PyType>,
    type_mismatch: Py<PyType>,
    engine_rejected: Py<PyType>,
    internal_invariant: Py<PyType>,
    allocation: Py<PyType>,
}

static ERROR_TYPES: GILOnceCell<ErrorTypes> = GILOnceCell::new();

/// Builds `class name(TinyTidyError, builtin)` in the `tinytidy` module.
fn error_subclass(
    py: Python<'_>,
    name: &str,
    doc: &str,
    builtin: Bound<'_, PyType>,
) -> PyResult<Py<PyType>> {
    let bases = PyTuple::new(py, [py.get_type::<TinyTidyError>(), builtin])?;
    let namespace = PyDict::new(py);
    namespace.set_item("__module__", "tinytidy")?;
    namespace.set_item("__doc__", doc)?;
    let class = py.get_type::<PyType>().call1((name, bases, namespace))?;
    Ok(class.downcast_into::<PyType>()?.unbind())
}

fn error_types(py: Python<'_>) -> PyResult<&'static ErrorTypes> {
    ERROR_TYPES.get_or_try_init(py, || {
        Ok(ErrorTypes {
            invalid_argument: error_subclass(
                py,
                "InvalidArgumentError",
                "An argument has the wrong shape.",
                py.get_type::<PyTypeError>(),
            )?,
            unknown_option: error_subclass(
                py,
                "UnknownOptionError",
                "libtidy does not know an option name.",
                py.get_type::<PyKeyError>(),
            )?,
            type_mismatch: error_subclass(
                py,
                "TypeMismatchError",
                "An option value has the wrong type for the option.",
                py.get_type::<PyValueError>(),
            )?,
            engine_rejected: error_subclass(
                py,
                "EngineRejectedOptionError",
                "libtidy refused an option value.",
                py.get_type::<PyValueError>(),
            )?,
            internal_invariant: error_subclass(
                py,
                "InternalInvariantError",
                "libtidy declared an option type this module does not handle.",
                py.get_type::<PyRuntimeError>(),
            )?,
            allocation: error_subclass(
                py,
                "AllocationError",
                "libtidy could not allocate a document or buffer.",
                py.get_type::<PyMemoryError>(),
            )?,
        })
    })
}

fn raise(py: Python<'_>, class: &Py<PyType>, message: String) -> PyErr {
    PyErr::from_type(class.bind(py).clone(), message)
}

fn to_py_err(py: Python<'_>, err: TidyError) -> PyErr {
    let types = match error_types(py) {
        Ok(types) => types,
        Err(init) => return init,
    };
    let class = match err {
        TidyError::InvalidArgument { .. } => &types.invalid_argument,
        TidyError::UnknownOption { .. } => &types.unknown_option,
        TidyError::TypeMismatch { .. } => &types.type_mismatch,
        TidyError::EngineRejectedOption { .. } => &types.engine_rejected,
        TidyError::InternalInvariant { .. } => &types.internal_invariant,
        TidyError::Allocation { .. } => &types.allocation,
    };
    raise(py, class, err.to_string())
}

fn type_name(value: &Bound<'_, PyAny>) -> String {
    value
        .get_type()
        .name()
        .map_or_else(|_| "object".to_owned(), |name| name.to_string())
}

/// Reads a Python value into an [`OptionValue`].
///
/// `bool` is checked before `int` since it is a subclass.
fn option_value(value: &Bound<'_, PyAny>) -> PyResult<OptionValue> {
    if value.is_instance_of::<PyBool>() {
        return Ok(OptionValue::Boolean(value.extract()?));
    }
    if value.is_instance_of::<PyInt>() {
        return Ok(value
            .extract::<i64>()
            .map_or_else(|_| OptionValue::other("int"), OptionValue::Integer));
    }
    if let Ok(text) = value.downcast::<PyString>() {
        return Ok(OptionValue::Text(text.to_str()?.to_owned()));
    }
    Ok(OptionValue::other(type_name(value)))
}

/// Checks the shape of `options` and copies it out of Python.
fn options_arg(options: Option<&Bound<'_, PyAny>>) -> PyResult<OptionsArg> {
    let Some(options) = options.filter(|o| !o.is_none()) else {
        return Ok(OptionsArg::Absent);
    };
    let Ok(mapping) = options.downcast::<PyMapping>() else {
        return Ok(OptionsArg::invalid(format!(
            "options must be a mapping, not {}",
            type_name(options)
        )));
    };

    let mut table = OptionTable::new();
    for item in mapping.items()?.iter() {
        let (key, value): (Bound<'_, PyAny>, Bound<'_, PyAny>) = item.extract()?;
        let Ok(name) = key.downcast::<PyString>() else {
            return Ok(OptionsArg::invalid(format!(
                "option names must be str, not {}",
                type_name(&key)
            )));
        };
        table.insert(name.to_str()?, option_value(&value)?);
    }
    Ok(OptionsArg::Table(table))
}

fn source_bytes(py: Python<'_>, source: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(bytes) = source.downcast::<PyBytes>() {
        return Ok(bytes.as_bytes().to_vec());
    }
    if let Ok(text) = source.downcast::<PyString>() {
        return Ok(text.to_str()?.as_bytes().to_vec());
    }
    let message = format!("source must be bytes or str, not {}", type_name(source));
    Err(raise(py, &error_types(py)?.invalid_argument, message))
}

fn run<'py>(
    py: Python<'py>,
    source: &Bound<'py, PyAny>,
    options: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyBytes>> {
    let source = source_bytes(py, source)?;
    let options = options_arg(options)?;
    let output = py
        .allow_threads(|| tinytidy_native::parse_string(&source, &options))
        .map_err(|err| to_py_err(py, err))?;
    Ok(PyBytes::new(py, &output))
}

/// Cleans an HTML document with libtidy and returns the serialized bytes.
///
/// `options` maps libtidy option names to str, int or bool values.
#[pyfunction]
#[pyo3(name = "parseString", signature = (source, options=None))]
fn parse_string_camel<'py>(
    py: Python<'py>,
    source: &Bound<'py, PyAny>,
    options: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyBytes>> {
    run(py, source, options)
}

/// Alias of `parseString`.
#[pyfunction]
#[pyo3(signature = (source, options=None))]
fn parse_string<'py>(
    py: Python<'py>,
    source: &Bound<'py, PyAny>,
    options: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyBytes>> {
    run(py, source, options)
}

/// Returns the tinytidy module version.
#[pyfunction]
fn version() -> &'static str {
    VERSION
}

/// Returns the version of the linked libtidy.
#[pyfunction]
fn tidy_version() -> String {
    tinytidy_native::tidy_version()
}

/// Python module initialization.
#[pymodule]
fn tinytidy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("error", py.get_type::<TinyTidyError>())?;
    m.add("TinyTidyError", py.get_type::<TinyTidyError>())?;
    let types = error_types(py)?;
    m.add("InvalidArgumentError", types.invalid_argument.bind(py))?;
    m.add("UnknownOptionError", types.unknown_option.bind(py))?;
    m.add("TypeMismatchError", types.type_mismatch.bind(py))?;
    m.add("EngineRejectedOptionError", types.engine_rejected.bind(py))?;
    m.add("InternalInvariantError", types.internal_invariant.bind(py))?;
    m.add("AllocationError", types.allocation.bind(py))?;

    m.add_function(wrap_pyfunction!(parse_string_camel, m)?)?;
    m.add_function(wrap_pyfunction!(parse_string, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(tidy_version, m)?)?;
    Ok(())
}
