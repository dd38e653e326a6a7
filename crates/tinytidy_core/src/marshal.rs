//! Option marshaling.
//!
//! Translates an [`OptionTable`] into setter calls on an engine document,
//! checking each value against the kind the engine declares for it.

use crate::engine::{OptionKind, TidyEngine};
use crate::error::{ExpectedKind, TidyError, TidyResult};
use crate::value::{OptionTable, OptionValue};
use tracing::debug;

/// A typed setter call, decided from an option's kind and a caller value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setter<'v> {
    Text(&'v str),
    Integer(i64),
    Boolean(bool),
}

/// Decides how `value` is applied to an option of `kind`.
///
/// This is the whole kind-mismatch policy: every (kind, value) pair is
/// either a setter call or an error. Booleans and integers stand in for
/// each other (false is 0, non-zero is true), nothing else is coerced.
fn select_setter<'v>(
    name: &str,
    kind: OptionKind,
    value: &'v OptionValue,
) -> TidyResult<Setter<'v>> {
    let mismatch = |expected| TidyError::TypeMismatch {
        name: name.to_owned(),
        expected,
    };

    match (kind, value) {
        (OptionKind::Text, OptionValue::Text(text)) => Ok(Setter::Text(text)),
        (OptionKind::Text, _) => Err(mismatch(ExpectedKind::Text)),

        (OptionKind::Integer, OptionValue::Integer(n)) => Ok(Setter::Integer(*n)),
        (OptionKind::Integer, OptionValue::Boolean(b)) => Ok(Setter::Integer(i64::from(*b))),
        (OptionKind::Integer, _) => Err(mismatch(ExpectedKind::Integer)),

        (OptionKind::Boolean, OptionValue::Boolean(b)) => Ok(Setter::Boolean(*b)),
        (OptionKind::Boolean, OptionValue::Integer(n)) => Ok(Setter::Boolean(*n != 0)),
        (OptionKind::Boolean, _) => Err(mismatch(ExpectedKind::BooleanOrInteger)),

        (OptionKind::Unsupported(code), _) => Err(TidyError::InternalInvariant {
            name: name.to_owned(),
            kind: code,
        }),
    }
}

/// Applies every entry of `table` to `document`.
///
/// Entries are applied in name order and processing stops at the first
/// failure; options applied before it stay set on the document. The
/// document and buffer are not released here.
///
/// `error_buffer` must be the buffer attached to `document`; its contents
/// become the diagnostic of [`TidyError::EngineRejectedOption`], or a note
/// naming the value when the engine wrote nothing.
///
/// Returns the number of options applied.
///
/// # Errors
///
/// - [`TidyError::UnknownOption`] if the engine does not know a name
/// - [`TidyError::TypeMismatch`] if a value does not fit the option's kind
/// - [`TidyError::EngineRejectedOption`] if a setter reports failure
/// - [`TidyError::InternalInvariant`] if the engine declares an unknown kind
pub fn apply_options<E: TidyEngine>(
    engine: &E,
    document: &mut E::Document,
    error_buffer: &E::Buffer,
    table: &OptionTable,
) -> TidyResult<usize> {
    for (name, value) in table {
        let option = engine
            .option_by_name(document, name)
            .ok_or_else(|| TidyError::UnknownOption { name: name.clone() })?;

        let kind = engine.option_kind(&option);
        let id = engine.option_id(&option);
        let setter = select_setter(name, kind, value).inspect_err(|_| {
            debug!(option = %name, ?kind, given = value.type_name(), "value does not fit option");
        })?;

        let accepted = match setter {
            Setter::Text(text) => engine.set_text_option(document, id, text),
            Setter::Integer(n) => engine.set_integer_option(document, id, n),
            Setter::Boolean(b) => engine.set_boolean_option(document, id, b),
        };

        if !accepted {
            let mut diagnostic = String::from_utf8_lossy(&engine.buffer_contents(error_buffer))
                .trim_end()
                .to_owned();
            if diagnostic.is_empty() {
                diagnostic = format!("value {value} not accepted");
            }
            return Err(TidyError::EngineRejectedOption {
                name: name.clone(),
                diagnostic,
            });
        }

        debug!(option = %name, ?id, value = %value, "applied option");
    }

    Ok(table.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(kind: OptionKind, value: &OptionValue) -> TidyResult<Setter<'_>> {
        select_setter("opt", kind, value)
    }

    fn expected(result: TidyResult<Setter<'_>>) -> Option<ExpectedKind> {
        match result {
            Err(TidyError::TypeMismatch { expected, .. }) => Some(expected),
            _ => None,
        }
    }

    #[test]
    fn text_option_accepts_only_text() {
        let text = OptionValue::from("omit");
        assert_eq!(select(OptionKind::Text, &text), Ok(Setter::Text("omit")));

        for value in [
            OptionValue::Integer(1),
            OptionValue::Boolean(true),
            OptionValue::other("float"),
        ] {
            assert_eq!(
                expected(select(OptionKind::Text, &value)),
                Some(ExpectedKind::Text)
            );
        }
    }

    #[test]
    fn integer_option_reads_booleans_as_zero_and_one() {
        assert_eq!(
            select(OptionKind::Integer, &OptionValue::Integer(-4)),
            Ok(Setter::Integer(-4))
        );
        assert_eq!(
            select(OptionKind::Integer, &OptionValue::Boolean(true)),
            Ok(Setter::Integer(1))
        );
        assert_eq!(
            select(OptionKind::Integer, &OptionValue::Boolean(false)),
            Ok(Setter::Integer(0))
        );
        assert_eq!(
            expected(select(OptionKind::Integer, &OptionValue::other("float"))),
            Some(ExpectedKind::Integer)
        );
        assert_eq!(
            expected(select(OptionKind::Integer, &OptionValue::from("80"))),
            Some(ExpectedKind::Integer)
        );
    }

    #[test]
    fn boolean_option_reads_integers_as_truth_values() {
        assert_eq!(
            select(OptionKind::Boolean, &OptionValue::Integer(0)),
            Ok(Setter::Boolean(false))
        );
        assert_eq!(
            select(OptionKind::Boolean, &OptionValue::Integer(1)),
            Ok(Setter::Boolean(true))
        );
        assert_eq!(
            select(OptionKind::Boolean, &OptionValue::Integer(-3)),
            Ok(Setter::Boolean(true))
        );
        assert_eq!(
            select(OptionKind::Boolean, &OptionValue::Boolean(false)),
            Ok(Setter::Boolean(false))
        );
        assert_eq!(
            expected(select(OptionKind::Boolean, &OptionValue::from("yes"))),
            Some(ExpectedKind::BooleanOrInteger)
        );
    }

    #[test]
    fn unsupported_kind_is_never_skipped() {
        for value in [OptionValue::Integer(1), OptionValue::from("x")] {
            assert_eq!(
                select(OptionKind::Unsupported(9), &value),
                Err(TidyError::InternalInvariant {
                    name: "opt".into(),
                    kind: 9
                })
            );
        }
    }
}
