//! medscan CLI - structured extraction from scanned medical documents

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use medscan::engine::probe_engines;
use medscan::export::{self, JsonFormat};
use medscan::{
    CleanupPreset, Document, DocumentKind, EngineConfig, ExtractOptions, Extraction, Extractor,
    StructuredRecord,
};

#[derive(Parser)]
#[command(name = "medscan")]
#[command(version)]
#[command(about = "Extract structured fields from scanned prescriptions and patient forms", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// pdftoppm executable
    #[arg(long, global = true, env = "MEDSCAN_PDFTOPPM", value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// tesseract executable
    #[arg(long, global = true, env = "MEDSCAN_TESSERACT", value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// OCR language(s), e.g. "eng" or "eng+deu"
    #[arg(long, global = true, env = "MEDSCAN_OCR_LANG")]
    lang: Option<String>,

    /// Render resolution
    #[arg(long, global = true, env = "MEDSCAN_DPI")]
    dpi: Option<u32>,

    /// Tesseract page segmentation mode
    #[arg(long, global = true)]
    psm: Option<u8>,

    /// Directory for per-request scratch files
    #[arg(long, global = true, env = "MEDSCAN_SCRATCH_DIR", value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Text cleanup preset
    #[arg(long, global = true, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Recognize rendered pages without binarization
    #[arg(long, global = true)]
    no_preprocess: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the fields of one document
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document kind
        #[arg(short, long)]
        kind: String,

        /// Output file (.xlsx or .json); fields are printed if not specified
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (inferred from the output extension by default)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Extract several documents of the same kind into one workbook
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Document kind
        #[arg(short, long)]
        kind: String,

        /// Output file (.xlsx or .json)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output format (inferred from the output extension by default)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the recognized text of a document
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Parse a text file that was recognized elsewhere
    Parse {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document kind
        #[arg(short, long)]
        kind: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the fields extracted for each document kind
    Fields {
        /// Only this kind
        #[arg(value_name = "KIND")]
        kind: Option<String>,
    },

    /// Check that the external engines can be run
    Check,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Leave recognized text untouched
    None,
    /// Line endings, Unicode, stray control characters (default)
    Minimal,
    /// Minimal plus whitespace collapsing
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::None => CleanupPreset::None,
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// JSON
    Json,
}

impl OutputFormat {
    fn resolve(explicit: Option<Self>, path: &Path) -> Self {
        explicit.unwrap_or_else(|| {
            match path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .as_deref()
            {
                Some("json") => OutputFormat::Json,
                _ => OutputFormat::Xlsx,
            }
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Extract {
            input,
            kind,
            output,
            format,
        } => cmd_extract(&cli.engine, &input, &kind, output.as_deref(), format),
        Commands::Batch {
            inputs,
            kind,
            output,
            format,
        } => cmd_batch(&cli.engine, &inputs, &kind, &output, format),
        Commands::Text { input, output } => cmd_text(&cli.engine, &input, output.as_deref()),
        Commands::Parse {
            input,
            kind,
            output,
            compact,
        } => cmd_parse(&input, &kind, output.as_deref(), compact),
        Commands::Fields { kind } => cmd_fields(kind.as_deref()),
        Commands::Check => cmd_check(&cli.engine),
    };

    if let Err(e) = result {
        match e.downcast_ref::<medscan::Error>() {
            Some(err) => eprintln!("{} [{}]: {}", "Error".red().bold(), err.code(), err),
            None => eprintln!("{}: {}", "Error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn engine_config(args: &EngineArgs) -> EngineConfig {
    let mut config = EngineConfig::new();
    if let Some(ref path) = args.pdftoppm {
        config = config.with_pdftoppm(path);
    }
    if let Some(ref path) = args.tesseract {
        config = config.with_tesseract(path);
    }
    if let Some(ref lang) = args.lang {
        config = config.with_language(lang);
    }
    if let Some(dpi) = args.dpi {
        config = config.with_dpi(dpi);
    }
    if let Some(psm) = args.psm {
        config = config.with_page_segmentation_mode(psm);
    }
    config
}

fn build_extractor(args: &EngineArgs) -> Result<Extractor, Box<dyn std::error::Error>> {
    let mut options = ExtractOptions::new().with_engine(engine_config(args));
    if let Some(ref dir) = args.scratch_dir {
        options = options.with_scratch_root(dir);
    }
    if let Some(level) = args.cleanup {
        options = options.with_cleanup_preset(level.into());
    }
    if args.no_preprocess {
        options = options.without_preprocessing();
    }
    Ok(Extractor::new(options)?)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_record(record: &StructuredRecord) {
    let width = record.fields().iter().map(|f| f.len()).max().unwrap_or(0);
    for (field, value) in record.iter() {
        let value = if value.is_empty() {
            "(not found)".dimmed().to_string()
        } else {
            value.replace('\n', &format!("\n{:width$}  ", "", width = width))
        };
        println!("{}  {}", format!("{:width$}", field, width = width).bold(), value);
    }
}

fn cmd_extract(
    args: &EngineArgs,
    input: &Path,
    kind: &str,
    output: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: DocumentKind = kind.parse()?;
    let extractor = build_extractor(args)?;

    let pb = spinner("Recognizing document...");
    let result = extractor.extract(&Document::from_file(input, kind)?);
    pb.finish_and_clear();
    let extraction = result?;

    match output {
        Some(path) => {
            match OutputFormat::resolve(format, path) {
                OutputFormat::Xlsx => export::write_xlsx(&extraction.record, path)?,
                OutputFormat::Json => fs::write(
                    path,
                    export::to_json(&extraction.record, JsonFormat::Pretty)?,
                )?,
            }
            println!("{} {}", "Saved to".green(), path.display());
        }
        None if format == Some(OutputFormat::Json) => {
            println!("{}", export::to_json(&extraction.record, JsonFormat::Pretty)?);
        }
        None => {
            println!(
                "{} ({}, {} page(s))",
                input.display().to_string().cyan().bold(),
                extraction.kind,
                extraction.page_count
            );
            println!("{}", "─".repeat(40).dimmed());
            print_record(&extraction.record);
        }
    }

    Ok(())
}

fn cmd_batch(
    args: &EngineArgs,
    inputs: &[PathBuf],
    kind: &str,
    output: &Path,
    format: Option<OutputFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: DocumentKind = kind.parse()?;
    let extractor = build_extractor(args)?;

    let docs = inputs
        .iter()
        .map(|path| Document::from_file(path, kind))
        .collect::<medscan::Result<Vec<_>>>()?;

    let pb = spinner(&format!("Extracting {} documents...", docs.len()));
    let results = extractor.extract_batch(&docs);
    pb.finish_and_clear();

    let mut extractions: Vec<&Extraction> = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in inputs.iter().zip(&results) {
        match result {
            Ok(extraction) => {
                println!(
                    "{} {} ({}/{} fields)",
                    "Extracted".green(),
                    path.display(),
                    extraction.record.filled_count(),
                    extraction.record.len()
                );
                extractions.push(extraction);
            }
            Err(e) => {
                failed += 1;
                println!(
                    "{} {}: [{}] {}",
                    "Failed".red(),
                    path.display(),
                    e.code(),
                    e
                );
            }
        }
    }

    match OutputFormat::resolve(format, output) {
        OutputFormat::Xlsx => export::write_batch_xlsx(&docs, &results, output)?,
        OutputFormat::Json => fs::write(output, export::to_json(&extractions, JsonFormat::Pretty)?)?,
    }
    println!("{} {}", "Saved to".green(), output.display());

    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, inputs.len()).into());
    }

    println!(
        "\n{} {} documents extracted",
        "Done!".green().bold(),
        extractions.len()
    );
    Ok(())
}

fn cmd_text(
    args: &EngineArgs,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(args)?;
    let data = fs::read(input)?;

    let pb = spinner("Recognizing document...");
    let result = extractor.recognize(&data);
    pb.finish_and_clear();
    let recognized = result?;

    if let Some(path) = output {
        fs::write(path, &recognized.text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", recognized.text);
    }

    Ok(())
}

fn cmd_parse(
    input: &Path,
    kind: &str,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: DocumentKind = kind.parse()?;
    let text = fs::read_to_string(input)?;
    let record = medscan::parse_text(kind, &text);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = export::to_json(&record, format)?;

    if let Some(path) = output {
        fs::write(path, json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_fields(kind: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = match kind {
        Some(name) => vec![name.parse::<DocumentKind>()?],
        None => DocumentKind::ALL.to_vec(),
    };

    for kind in kinds {
        println!("{}", kind.as_str().cyan().bold());
        let fields = kind.fields();
        for (i, field) in fields.iter().enumerate() {
            let branch = if i + 1 == fields.len() { "└─" } else { "├─" };
            println!("  {} {}", branch.dimmed(), field);
        }
    }

    Ok(())
}

fn cmd_check(args: &EngineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = engine_config(args);
    config.validate()?;

    println!("{}", "Engines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let statuses = probe_engines(&config);
    for status in &statuses {
        match status.version {
            Ok(ref version) => println!(
                "{} {} ({}) {}",
                "ok".green().bold(),
                status.name.bold(),
                status.executable.display(),
                version.dimmed()
            ),
            Err(ref reason) => println!(
                "{} {} ({}) {}",
                "missing".red().bold(),
                status.name.bold(),
                status.executable.display(),
                reason
            ),
        }
    }

    let missing = statuses.iter().filter(|s| !s.is_available()).count();
    if missing > 0 {
        return Err(format!("{} engine(s) unavailable", missing).into());
    }
    Ok(())
}
