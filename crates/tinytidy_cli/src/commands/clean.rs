//! Clean command implementation.

use std::io::{Read, Write};
use std::path::Path;
use tinytidy_core::OptionTable;
use tracing::info;

/// Runs the clean command.
pub fn run(
    input: Option<&Path>,
    options: &OptionTable,
    output: Option<&Path>,
    show_diagnostics: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = match input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };

    let report = tinytidy_native::tidy().clean_with_report(&source, Some(options))?;

    if show_diagnostics && report.has_diagnostics() {
        eprintln!("{}", report.diagnostics);
    }

    match output {
        Some(path) => std::fs::write(path, &report.output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&report.output)?;
            stdout.flush()?;
        }
    }

    info!(
        bytes = report.output.len(),
        options = options.len(),
        status = %report.status,
        "cleaned document"
    );
    Ok(())
}
