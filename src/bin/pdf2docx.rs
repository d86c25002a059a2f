//! CLI binary for edgequake-pdf2docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2docx::{
    convert, convert_to_file, inspect, ConversionConfig, ConversionOutput,
    ConversionProgressCallback, FormattingLevel, LayoutThresholds, PageSelection,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Count of pages that were skipped.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_conversion_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        // Spinner only until the page count is known.
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Classifying");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rebuilding structure of {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, block_count: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{block_count:>4} blocks")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed > 0 {
            eprintln!(
                "{} {}/{} pages read  ({} skipped)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Prompt for the input path, write PDF-Ultra-Formatted.docx
  pdf2docx

  # Convert a file to a chosen output path
  pdf2docx report.pdf -o report.docx

  # Paragraphs only
  pdf2docx --level minimal scan-free.pdf

  # Résumé: capitalised section titles and keyword sections become headings
  pdf2docx --caps-headings --section-keyword experience --section-keyword skills cv.pdf

  # Specific pages, one continuous flow
  pdf2docx --pages 3-15 --no-page-breaks book.pdf -o chapter.docx

  # Classified blocks as JSON, no DOCX written
  pdf2docx --json report.pdf > report.json

  # Inspect PDF metadata
  pdf2docx --inspect-only report.pdf

FORMATTING LEVELS:
  Level        Default output                 Reconstructs
  ──────────   ─────────────────────────────  ─────────────────────────────
  minimal      PDF-Enhanced-output.docx       paragraphs
  structured   PDF-Advanced-Formatted.docx    + headings, bullets, tables
  maximal      PDF-Ultra-Formatted.docx       + contact lines, heading depth

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Directory or file of an existing libpdfium
  RUST_LOG                Override the log filter (e.g. edgequake_pdf2docx=debug)

Only PDFs with a native text layer are supported; scanned pages come out empty.
"#;

/// Convert PDF files to editable DOCX.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2docx",
    version,
    about = "Convert PDF files to editable DOCX",
    long_about = "Convert native-text PDF documents to editable Word files. Paragraphs, \
headings, bullet lists, tables and contact lines are reconstructed from the text layer's \
geometry; no network access or OCR is involved.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path. Prompted for when omitted.
    input: Option<String>,

    /// Write the DOCX to this file instead of the level's default name.
    #[arg(short, long, env = "PDF2DOCX_OUTPUT")]
    output: Option<PathBuf>,

    /// How much structure to reconstruct.
    #[arg(long, env = "PDF2DOCX_LEVEL", value_enum, default_value = "maximal")]
    level: LevelArg,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2DOCX_PAGES", default_value = "all")]
    pages: String,

    /// Do not insert a page break between PDF pages.
    #[arg(long, env = "PDF2DOCX_NO_PAGE_BREAKS")]
    no_page_breaks: bool,

    /// Treat short all-caps lines as headings.
    #[arg(long, env = "PDF2DOCX_CAPS_HEADINGS")]
    caps_headings: bool,

    /// Short lines containing this word become underlined section headers (maximal only). Repeatable.
    #[arg(long = "section-keyword", env = "PDF2DOCX_SECTION_KEYWORDS", value_delimiter = ',')]
    section_keywords: Vec<String>,

    /// JSON file overriding layout thresholds.
    #[arg(long, env = "PDF2DOCX_THRESHOLDS")]
    thresholds: Option<PathBuf>,

    /// Path to the pdfium shared library (file or directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print the conversion result as JSON instead of writing DOCX.
    #[arg(long, env = "PDF2DOCX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2DOCX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Minimal,
    Structured,
    Maximal,
}

impl From<LevelArg> for FormattingLevel {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Minimal => FormattingLevel::Minimal,
            LevelArg::Structured => FormattingLevel::Structured,
            LevelArg::Maximal => FormattingLevel::Maximal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let input = match cli.input {
        Some(ref s) => s.clone(),
        None => prompt_for_input()?,
    };

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let meta = inspect(&input, &config).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.json {
        let output = convert(&input, &config).context("Conversion failed")?;
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.level.default_output_name()));
    let output = convert_to_file(&input, &output_path, &config).context("Conversion failed")?;

    if !cli.quiet {
        print_summary(&output, &output_path);
    }
    Ok(())
}

/// Ask for the PDF path on stdin.
fn prompt_for_input() -> Result<String> {
    print!("Enter the path to the PDF file: ");
    io::stdout().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the PDF path")?;
    Ok(line)
}

fn print_summary(output: &ConversionOutput, path: &std::path::Path) {
    let stats = &output.stats;
    println!(
        "{} Conversion complete. Saved to {}",
        if output.warnings.is_empty() { green("✔") } else { cyan("⚠") },
        bold(&path.display().to_string())
    );
    eprintln!(
        "   {} pages  /  {} headings  {} bullets  {} paragraphs  {} tables  {} contact lines  —  {}ms",
        dim(&stats.processed_pages.to_string()),
        dim(&stats.headings.to_string()),
        dim(&stats.bullet_items.to_string()),
        dim(&stats.paragraphs.to_string()),
        dim(&stats.tables.to_string()),
        dim(&stats.contact_lines.to_string()),
        stats.total_duration_ms,
    );
    for warning in &output.warnings {
        eprintln!("   {} {}", cyan("⚠"), warning);
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ConversionConfig::builder()
        .level(cli.level.into())
        .pages(pages)
        .page_breaks(!cli.no_page_breaks)
        .caps_headings(cli.caps_headings)
        .section_keywords(cli.section_keywords.iter().cloned());

    if let Some(ref path) = cli.thresholds {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read thresholds from {:?}", path))?;
        builder = builder.thresholds(LayoutThresholds::from_json(&json)?);
    }
    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(path.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
