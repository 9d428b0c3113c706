use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use docconv::{Config, ConversionKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docconv")]
#[command(about = "Convert documents between Markdown, HTML, Word, CSV, JSON and XML")]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, global = true, default_value = "docconv.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a text-to-text conversion
    Convert {
        /// Conversion to apply
        #[arg(short, long, value_enum)]
        to: ConversionKind,

        /// Input file (defaults to stdin)
        input: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a Word document to Markdown
    WordToMarkdown {
        /// Input .docx file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert Markdown to a Word document
    MarkdownToWord {
        /// Input Markdown file (defaults to stdin)
        input: Option<PathBuf>,

        /// Output .docx file (defaults to the configured name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let (config, config_error) = Config::load(&cli.config);
    init_logging(&config);
    if let Some(e) = config_error {
        tracing::warn!(path = %cli.config.display(), error = %e, "invalid config, using defaults");
    }

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(command: Command, config: &Config) -> Result<(), String> {
    match command {
        Command::Convert { to, input, output } => {
            let text = read_text(input.as_deref())?;
            let converted = to.convert(&text, config).map_err(|e| e.to_string())?;
            write_text(output.as_deref(), &converted)
        }
        Command::WordToMarkdown { input, output } => {
            let bytes = fs::read(&input)
                .map_err(|e| format!("reading {}: {}", input.display(), e))?;
            let markdown = docconv::docx_to_markdown(&bytes).map_err(|e| e.to_string())?;
            write_text(output.as_deref(), &markdown)
        }
        Command::MarkdownToWord { input, output } => {
            let markdown = read_text(input.as_deref())?;
            let bytes = docconv::markdown_to_docx_with_config(&markdown, config)
                .map_err(|e| e.to_string())?;

            let output = output.unwrap_or_else(|| PathBuf::from(&config.word.output_name));
            fs::write(&output, bytes)
                .map_err(|e| format!("writing {}: {}", output.display(), e))?;
            eprintln!("Created {}", output.display());
            Ok(())
        }
    }
}

fn read_text(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path.display(), e))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("reading stdin: {}", e))?;
            Ok(text)
        }
    }
}

fn write_text(path: Option<&Path>, text: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            fs::write(path, text).map_err(|e| format!("writing {}: {}", path.display(), e))
        }
        None => write_to(&mut io::stdout().lock(), text),
    }
}

/// Write converted text as is; it already ends the way the conversion wants.
fn write_to(out: &mut impl Write, text: &str) -> Result<(), String> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| format!("writing stdout: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_output_adds_no_trailing_newline() {
        let table = docconv::csv_to_markdown("a,b\n1,2\n", &Default::default()).unwrap();
        let mut out = Vec::new();
        write_to(&mut out, &table).unwrap();
        assert_eq!(out, b"| a | b |\n| --- | --- |\n| 1 | 2 |\n");
    }

    #[test]
    fn cli_parses_convert_kind() {
        let cli = Cli::try_parse_from(["docconv", "convert", "--to", "csv-to-markdown"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Convert {
                to: ConversionKind::CsvToMarkdown,
                input: None,
                output: None
            }
        ));
    }
}
