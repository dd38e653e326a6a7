//! TinyTidy CLI
//!
//! Command-line HTML cleanup over the system libtidy.
//!
//! # Commands
//!
//! - `clean` - Clean a document from a file or stdin
//! - `check-options` - Validate options without parsing anything
//! - `version` - Show CLI and libtidy versions

mod commands;

use clap::{Parser, Subcommand};
use commands::options::OptionArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// HTML cleanup with libtidy.
#[derive(Parser)]
#[command(name = "tinytidy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a document and write the result
    Clean {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,

        #[command(flatten)]
        options: OptionArgs,

        /// Write the result to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print libtidy's diagnostics to stderr
        #[arg(short, long)]
        diagnostics: bool,
    },

    /// Check that options are accepted by libtidy
    CheckOptions {
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the document.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Clean {
            input,
            options,
            output,
            diagnostics,
        } => {
            let table = options.to_table()?;
            commands::clean::run(input.as_deref(), &table, output.as_deref(), diagnostics)?;
        }
        Commands::CheckOptions { options } => {
            let table = options.to_table()?;
            commands::check::run(&table)?;
        }
        Commands::Version => {
            println!("TinyTidy CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("TinyTidy Core v{}", tinytidy_core::VERSION);
            println!("libtidy v{}", tinytidy_native::tidy_version());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinytidy_core::OptionValue;

    #[test]
    fn parses_clean_arguments() {
        let cli = Cli::try_parse_from([
            "tinytidy",
            "-v",
            "clean",
            "page.html",
            "-o",
            "indent=1",
            "-o",
            "doctype=html5",
            "-c",
            "base.json",
            "--output",
            "out.html",
        ])
        .unwrap();
        assert!(cli.verbose);

        let Commands::Clean {
            input,
            options,
            output,
            diagnostics,
        } = cli.command
        else {
            panic!("expected clean");
        };
        assert_eq!(input, Some(PathBuf::from("page.html")));
        assert_eq!(output, Some(PathBuf::from("out.html")));
        assert!(!diagnostics);
        assert_eq!(options.presets, vec![PathBuf::from("base.json")]);
        assert_eq!(
            options.assignments,
            vec![
                ("indent".to_owned(), OptionValue::Integer(1)),
                ("doctype".to_owned(), OptionValue::from("html5")),
            ]
        );
    }

    #[test]
    fn rejects_malformed_assignment() {
        assert!(Cli::try_parse_from(["tinytidy", "check-options", "-o", "indent"]).is_err());
    }

    #[test]
    fn clean_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["tinytidy", "clean"]).unwrap();
        assert!(matches!(cli.command, Commands::Clean { input: None, .. }));
    }
}
