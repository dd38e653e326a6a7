//! Option flags shared by the commands.

use crate::commands::preset::{load_preset, PresetError};
use clap::Args;
use std::path::PathBuf;
use tinytidy_core::{OptionTable, OptionValue};

/// `-o` and `-c` flags.
#[derive(Debug, Args)]
pub struct OptionArgs {
    /// Set a libtidy option (repeatable); prefix the value with `str:` to
    /// force text
    #[arg(
        short = 'o',
        long = "option",
        value_name = "NAME=VALUE",
        value_parser = parse_assignment
    )]
    pub assignments: Vec<(String, OptionValue)>,

    /// Load options from a JSON preset file (repeatable)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub presets: Vec<PathBuf>,
}

impl OptionArgs {
    /// Merges presets in order, then `-o` flags. Later entries win.
    pub fn to_table(&self) -> Result<OptionTable, PresetError> {
        let mut table = OptionTable::new();
        for path in &self.presets {
            table.extend(load_preset(path)?);
        }
        table.extend(self.assignments.iter().cloned());
        Ok(table)
    }
}

/// Parses `name=value`.
pub fn parse_assignment(raw: &str) -> Result<(String, OptionValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing option name in '{raw}'"));
    }
    Ok((name.to_owned(), infer_value(value)))
}

/// Guesses the kind of a command-line value.
pub fn infer_value(raw: &str) -> OptionValue {
    if let Some(text) = raw.strip_prefix("str:") {
        return OptionValue::from(text);
    }
    match raw {
        "true" | "yes" => OptionValue::Boolean(true),
        "false" | "no" => OptionValue::Boolean(false),
        _ => raw
            .parse::<i64>()
            .map_or_else(|_| OptionValue::from(raw), OptionValue::Integer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn infers_kinds() {
        assert_eq!(infer_value("yes"), OptionValue::Boolean(true));
        assert_eq!(infer_value("false"), OptionValue::Boolean(false));
        assert_eq!(infer_value("72"), OptionValue::Integer(72));
        assert_eq!(infer_value("-1"), OptionValue::Integer(-1));
        assert_eq!(infer_value("html5"), OptionValue::from("html5"));
        assert_eq!(infer_value(""), OptionValue::from(""));
    }

    #[test]
    fn str_prefix_forces_text() {
        assert_eq!(infer_value("str:80"), OptionValue::from("80"));
        assert_eq!(infer_value("str:yes"), OptionValue::from("yes"));
    }

    #[test]
    fn assignment_splits_at_first_equals() {
        assert_eq!(
            parse_assignment("alt-text=a=b").unwrap(),
            ("alt-text".to_owned(), OptionValue::from("a=b"))
        );
        assert!(parse_assignment("indent").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn flags_override_presets() {
        let mut first = NamedTempFile::new().unwrap();
        write!(first, r#"{{"indent": 1, "wrap": 40}}"#).unwrap();
        let mut second = NamedTempFile::new().unwrap();
        write!(second, r#"{{"wrap": 60, "doctype": "omit"}}"#).unwrap();

        let args = OptionArgs {
            assignments: vec![("doctype".to_owned(), OptionValue::from("html5"))],
            presets: vec![first.path().to_owned(), second.path().to_owned()],
        };
        let table = args.to_table().unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("indent"), Some(&OptionValue::Integer(1)));
        assert_eq!(table.get("wrap"), Some(&OptionValue::Integer(60)));
        assert_eq!(table.get("doctype"), Some(&OptionValue::from("html5")));
    }
}
