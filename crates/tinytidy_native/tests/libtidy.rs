//! Tests against the system libtidy.

use tinytidy_core::{ExpectedKind, OptionTable, OptionValue, OptionsArg, TidyError};
use tinytidy_native::{clean, parse_string, tidy, tidy_version};

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn repairs_unclosed_paragraph() {
    let options = OptionTable::new().with("indent", 1);
    let out = text(&clean(b"<p>hi", Some(&options)).unwrap());
    assert!(out.contains("</p>"), "{out}");
    assert!(out.contains("hi"));
}

#[test]
fn xhtml_output_with_declaration() {
    let options = OptionTable::new()
        .with("indent", 1)
        .with("markup", 1)
        .with("add-xml-decl", 1)
        .with("output-xhtml", 1);
    let out = text(&clean(b"<title>Foo</title><p>Foo!", Some(&options)).unwrap());
    assert!(out.starts_with("<?xml"), "{out}");
    assert!(out.contains("<title>Foo</title>"));
    assert!(out.contains("http://www.w3.org/1999/xhtml"));
    assert!(out.contains("Foo!"));
}

#[test]
fn boolean_options_take_booleans_and_integers() {
    let values: [OptionValue; 4] = [true.into(), false.into(), 0.into(), 1.into()];
    for value in values {
        let mut options = OptionTable::new();
        options.insert("markup", value);
        assert!(clean(b"<p>hi", Some(&options)).is_ok());
    }
}

#[test]
fn indent_takes_a_boolean() {
    let options = OptionTable::new().with("indent", true);
    let out = text(&clean(b"<p>hi", Some(&options)).unwrap());
    assert!(out.contains("</p>"), "{out}");
    assert!(clean(b"<p>hi", Some(&OptionTable::new().with("indent", false))).is_ok());
}

#[test]
fn unknown_option() {
    let options = OptionTable::new().with("indnet", 1);
    let err = clean(b"<p>hi", Some(&options)).unwrap_err();
    assert_eq!(
        err,
        TidyError::UnknownOption {
            name: "indnet".into()
        }
    );
}

#[test]
fn kind_mismatches() {
    let cases = [
        ("wrap", OptionValue::from("80"), ExpectedKind::Integer),
        ("alt-text", OptionValue::from(3), ExpectedKind::Text),
        ("markup", OptionValue::from("yes"), ExpectedKind::BooleanOrInteger),
    ];
    for (name, value, expected) in cases {
        let mut options = OptionTable::new();
        options.insert(name, value);
        let err = clean(b"<p>hi", Some(&options)).unwrap_err();
        assert_eq!(
            err,
            TidyError::TypeMismatch {
                name: name.into(),
                expected
            }
        );
    }
}

#[test]
fn values_libtidy_cannot_take_are_rejected() {
    let negative = OptionTable::new().with("wrap", -1);
    let err = clean(b"<p>hi", Some(&negative)).unwrap_err();
    assert!(matches!(err, TidyError::EngineRejectedOption { ref name, .. } if name == "wrap"));

    let with_nul = OptionTable::new().with("alt-text", "a\0b");
    let err = clean(b"<p>hi", Some(&with_nul)).unwrap_err();
    assert_eq!(err.option_name(), Some("alt-text"));
}

#[test]
fn invalid_argument_before_engine() {
    let err = parse_string(b"<p>hi", &OptionsArg::invalid("options must be a mapping"))
        .unwrap_err();
    assert!(matches!(err, TidyError::InvalidArgument { .. }));
}

#[test]
fn output_is_deterministic() {
    let options = OptionTable::new().with("indent", 1).with("wrap", 60);
    let source = b"<ul><li>one<li>two</ul><p>para";
    let first = clean(source, Some(&options)).unwrap();
    assert_eq!(clean(source, Some(&options)).unwrap(), first);

    let again = clean(&first, Some(&options)).unwrap();
    assert_eq!(again, first);
}

#[test]
fn source_stops_at_nul() {
    let truncated = clean(b"<p>a\0<p>b", None).unwrap();
    assert_eq!(truncated, clean(b"<p>a", None).unwrap());
}

#[test]
fn report_carries_warnings() {
    let report = tidy().clean_with_report(b"<p>hi", None).unwrap();
    assert!(report.has_diagnostics());
    assert!(report.diagnostics.contains("Warning"), "{}", report.diagnostics);
}

#[test]
fn concurrent_documents_are_independent() {
    let options = OptionTable::new().with("indent", 1);
    let expected = clean(b"<p>shared", Some(&options)).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..20 {
                    assert_eq!(clean(b"<p>shared", Some(&options)).unwrap(), expected);
                }
            });
        }
    });
}

#[test]
fn reports_library_version() {
    let version = tidy_version();
    assert!(version.chars().next().is_some_and(|c| c.is_ascii_digit()), "{version}");
}
