//! CLI binary for pdf-summarize.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummarizerConfig`, asks for a word count when none is given, and prints
//! the summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_summarize::{
    parse_word_count, summarize_pdf, summarize_to_file, ProgressCallback, SummarizerConfig,
    SummaryMode, SummaryProgressCallback, DEFAULT_ENDPOINT, DEFAULT_WORD_COUNT,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints the progress lines to stdout and keeps a spinner on stderr while a
/// request is in flight.
struct CliProgressCallback {
    spinner: ProgressBar,
}

impl CliProgressCallback {
    fn new(show_spinner: bool) -> Arc<Self> {
        let spinner = if show_spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Arc::new(Self { spinner })
    }

    fn say(&self, line: &str) {
        self.spinner.suspend(|| println!("{line}"));
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self) {
        self.say("Extracting text from PDF...");
    }

    fn on_mode_selected(&self, mode: SummaryMode) {
        match mode {
            SummaryMode::TextLayer => self.say("Text layer found. Summarizing..."),
            SummaryMode::PageImages => {
                self.say("No text layer found. Sending images for multimodal analysis...")
            }
        }
    }

    fn on_pages_rendered(&self, pages: usize) {
        self.say(&format!("Rendered {pages} pages."));
    }

    fn on_request_attempt(&self, attempt: u32, max_attempts: u32) {
        let msg = if attempt == 0 {
            "Waiting for summary…".to_string()
        } else {
            format!("Waiting for summary (attempt {}/{})…", attempt + 1, max_attempts)
        };
        self.spinner.set_message(msg);
        self.spinner.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_rate_limited(&self, _attempt: u32, delay: Duration) {
        self.say(&format!(
            "API rate limit exceeded. Retrying in {:.2} seconds...",
            delay.as_secs_f64()
        ));
    }

    fn on_summary_complete(&self, _succeeded: bool) {
        self.spinner.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise document.pdf in the current directory (prompts for length)
  pdf-summarize

  # Summarise a specific file in ~150 words
  pdf-summarize report.pdf --words 150

  # Write the summary to a file
  pdf-summarize scan.pdf --words 300 -o scan-summary.txt

  # JSON output with mode and timing
  pdf-summarize report.pdf --words 100 --json

BEHAVIOUR:
  Documents with a text layer are summarised from their text. Documents
  without one (scans) are rendered page by page at --dpi and sent as images.
  HTTP 429 responses are retried up to --max-retries times, waiting
  1s, 2s, 4s, … (capped at 60s) between attempts.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY           API key sent as the `key` query parameter
  PDF_SUMMARIZE_ENDPOINT   Override the generateContent URL
  PDFIUM_LIB_PATH          Path to libpdfium (otherwise ./ then system paths)
  RUST_LOG                 Override the log filter (e.g. pdf_summarize=debug)
"#;

/// Summarise a PDF with the Gemini API.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-summarize",
    version,
    about = "Summarise a PDF with the Gemini API",
    long_about = "Summarise a PDF document with the Gemini generateContent API. The text layer \
is used when present; otherwise every page is rendered and sent as an image.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to summarise.
    #[arg(default_value = "document.pdf")]
    input: PathBuf,

    /// Target summary length in words. Prompted for when omitted.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    words: Option<u32>,

    /// Write the summary to this file as well as stdout.
    #[arg(short, long, env = "PDF_SUMMARIZE_OUTPUT")]
    output: Option<PathBuf>,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// generateContent endpoint URL (without the key).
    #[arg(long, env = "PDF_SUMMARIZE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Retries on HTTP 429 after the first attempt.
    #[arg(long, env = "PDF_SUMMARIZE_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,

    /// Rendering DPI for documents without a text layer (72–600).
    #[arg(long, env = "PDF_SUMMARIZE_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_SUMMARIZE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "PDF_SUMMARIZE_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Output structured JSON (SummaryOutput) instead of text.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF_SUMMARIZE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Print only the summary.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Progress lines already cover retries and failures; library warnings
    // would repeat them.
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Input check ──────────────────────────────────────────────────────
    if !cli.input.exists() {
        println!(
            "Error: The file '{}' was not found in the current directory.",
            cli.input.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let word_count = match cli.words {
        Some(n) => n,
        None if prompt_on_stderr(&cli) => prompt_word_count(io::stdin().lock(), io::stderr())?,
        None => prompt_word_count(io::stdin().lock(), io::stdout())?,
    };

    // ── Build config ─────────────────────────────────────────────────────
    let chatty = !cli.quiet && !cli.json;
    let progress_cb: Option<ProgressCallback> = if chatty {
        let cb = CliProgressCallback::new(!cli.no_progress);
        Some(cb as Arc<dyn SummaryProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let result = match cli.output {
        Some(ref output_path) => summarize_to_file(&cli.input, output_path, word_count, &config),
        None => summarize_pdf(&cli.input, word_count, &config),
    };

    match result {
        Ok(output) => {
            if cli.json {
                let json =
                    serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
                println!("{json}");
            } else {
                print_summary(output.summary.as_text(), cli.quiet);
                if let (Some(path), false) = (cli.output.as_deref(), cli.quiet) {
                    eprintln!("Summary written to {}", path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if cli.json {
                eprintln!("{e}");
            } else {
                print_summary(&e.to_string(), cli.quiet);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `--json` and `--quiet` reserve stdout for the result, so the word-count
/// prompt goes to stderr.
fn prompt_on_stderr(cli: &Cli) -> bool {
    cli.json || cli.quiet
}

fn print_summary(text: &str, quiet: bool) {
    if !quiet {
        println!("\n--- Summary ---");
    }
    println!("{text}");
}

/// Ask for a word count on `output` and read one line from `input`.
///
/// Anything that does not parse as a positive integer falls back to
/// [`DEFAULT_WORD_COUNT`].
fn prompt_word_count(mut input: impl BufRead, mut output: impl Write) -> Result<u32> {
    write!(
        output,
        "Enter the desired summary word count (e.g., {DEFAULT_WORD_COUNT}): "
    )?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read word count")?;

    Ok(match parse_word_count(&line) {
        Some(n) => n,
        None => {
            writeln!(
                output,
                "Invalid word count. Using default of {DEFAULT_WORD_COUNT}."
            )?;
            DEFAULT_WORD_COUNT
        }
    })
}

/// Map CLI args to `SummarizerConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizerConfig> {
    let mut builder = SummarizerConfig::builder()
        .api_key(cli.api_key.clone())
        .endpoint(cli.endpoint.clone())
        .max_retries(cli.max_retries)
        .dpi(cli.dpi)
        .request_timeout_secs(cli.timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn prompt(input: &str) -> (u32, String) {
        let mut out = Vec::new();
        let n = prompt_word_count(input.as_bytes(), &mut out).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prompt_reads_valid_count() {
        let (n, out) = prompt("150\n");
        assert_eq!(n, 150);
        assert!(out.starts_with("Enter the desired summary word count"));
        assert!(!out.contains("Invalid"));
    }

    #[test]
    fn prompt_defaults_on_garbage() {
        let (n, out) = prompt("abc\n");
        assert_eq!(n, 200);
        assert!(out.contains("Invalid word count. Using default of 200."));
    }

    #[test]
    fn prompt_defaults_on_eof() {
        let (n, _) = prompt("");
        assert_eq!(n, 200);
    }

    #[test]
    fn json_mode_prompts_on_stderr() {
        let json = Cli::try_parse_from(["pdf-summarize", "a.pdf", "--json"]).unwrap();
        let quiet = Cli::try_parse_from(["pdf-summarize", "a.pdf", "-q"]).unwrap();
        let plain = Cli::try_parse_from(["pdf-summarize", "a.pdf"]).unwrap();
        assert!(prompt_on_stderr(&json));
        assert!(prompt_on_stderr(&quiet));
        assert!(!prompt_on_stderr(&plain));

        // Prompt text lands in its own sink; the result stream stays clean.
        let mut prompt_sink = Vec::new();
        let n = prompt_word_count("abc\n".as_bytes(), &mut prompt_sink).unwrap();
        let mut result_sink = Vec::new();
        writeln!(result_sink, "{{\"word_count\": {n}}}").unwrap();

        let prompt_text = String::from_utf8(prompt_sink).unwrap();
        assert!(prompt_text.contains("Invalid word count"));
        let parsed: serde_json::Value = serde_json::from_slice(&result_sink).unwrap();
        assert_eq!(parsed["word_count"], 200);
    }

    /// Declared default of an argument, independent of the environment.
    fn declared_default(id: &str) -> String {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id().as_str() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["pdf-summarize"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("document.pdf"));
        assert_eq!(cli.words, None);
        assert_eq!(declared_default("max_retries"), "3");
        assert_eq!(declared_default("dpi"), "300");
        assert_eq!(declared_default("timeout"), "120");
        assert_eq!(declared_default("endpoint"), DEFAULT_ENDPOINT);
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pdf-summarize",
            "a.pdf",
            "--max-retries",
            "5",
            "--dpi",
            "150",
        ])
        .unwrap();
        assert_eq!(cli.max_retries, 5);
        assert_eq!(cli.dpi, 150);
    }

    #[test]
    fn cli_rejects_zero_words() {
        assert!(Cli::try_parse_from(["pdf-summarize", "a.pdf", "--words", "0"]).is_err());
    }
}
