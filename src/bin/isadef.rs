//! Command-line front end: compiles the definition set under a root directory and prints
//! the parsed summary followed by every expanded opcode form.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;

use isadef::isa::{DefError, IsaDefinition, JsonReport, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "isadef",
    version,
    about = "Compile layered JSON instruction set definitions and expand their mnemonic forms"
)]
struct Cli {
    /// Directory holding the definition documents.
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select the output format. text prints the parsed summary and form listing; json prints the compiled tables and forms."
    )]
    format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Print only the parsed summary and fingerprint, without the per-opcode listing."
    )]
    quiet: bool,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    });
    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, DefError> {
    let definition = IsaDefinition::from_directory(&cli.root)?;
    match cli.format {
        OutputFormat::Text => Ok(Report::new(&definition)?.quiet(cli.quiet).to_string()),
        OutputFormat::Json => {
            let mut json = JsonReport::new(&definition)?.to_json_pretty()?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["isadef"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from(["isadef", "defs/exvm", "--format", "json", "-q", "-vv"]);
        assert_eq!(cli.root, PathBuf::from("defs/exvm"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn missing_root_is_a_path_error() {
        let cli = Cli::parse_from(["isadef", "/definitely/not/here"]);
        assert!(matches!(run(&cli), Err(DefError::Path { .. })));
    }
}
