//! Check-options command implementation.

use tinytidy_core::OptionTable;

/// Runs the check-options command.
pub fn run(options: &OptionTable) -> Result<(), Box<dyn std::error::Error>> {
    match tinytidy_native::tidy().check_options(options) {
        Ok(count) => {
            println!("✓ {count} option(s) accepted");
            Ok(())
        }
        Err(err) => {
            println!("✗ {err}");
            Err(err.into())
        }
    }
}
