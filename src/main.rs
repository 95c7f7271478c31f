use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report_core::constants::{DEFAULT_BRAND, DEFAULT_FONT_DIR};
use report_core::{
    locale_from_env_value, normalize_bytes, parse_blocks, FieldRecord, Locale, Renderer,
    ReportConfig, ReportKind, ReportRequest, ReportService, TextRenderer,
};
use report_fonts::{default_chain, FallbackFontProvider, FileSystemRegistry};

#[derive(Parser)]
#[command(name = "avi-report")]
#[command(about = "Clinical report pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print sanitised text
    Normalize {
        /// Text file to sanitise
        file: PathBuf,
    },
    /// Print the parsed analysis blocks as JSON
    Blocks {
        /// Narrative file to parse
        file: PathBuf,
    },
    /// Assemble the report document and print it as JSON
    Assemble(ReportArgs),
    /// Print a plain-text preview of the report
    Preview(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Field record (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    record: PathBuf,
    /// Report kind: analysis, or questionnaire (sections only, narrative ignored)
    #[arg(long, default_value = "analysis")]
    kind: ReportKind,
    /// Analysis narrative (optional)
    #[arg(long)]
    analysis: Option<PathBuf>,
    /// Locale for dates (ru, uz, en); overrides REPORT_LOCALE
    #[arg(long)]
    locale: Option<String>,
    /// Logo asset handle; overrides REPORT_LOGO_REF
    #[arg(long)]
    logo: Option<String>,
}

/// Entry point for the report CLI.
///
/// # Environment Variables
/// - `REPORT_LOCALE`: default locale for dates (default: "ru")
/// - `REPORT_LOGO_REF`: logo asset handle (default: "/logologin.png")
/// - `REPORT_BRAND`: brand name in header and footer (default: "AviShifo")
/// - `REPORT_FONT_DIR`: directory with bundled Roboto files (default: "fonts")
/// - `RUST_LOG`: log filter; logs go to stderr
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("avi_report=info".parse()?)
                .add_directive("report_fonts=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config_from_env()?;
    tracing::info!(
        "++ Report config: locale {}, brand {}, fonts in {}",
        config.locale(),
        config.brand(),
        config.font_dir().display()
    );

    match cli.command {
        Commands::Normalize { file } => {
            let text = normalize_bytes(&read_bytes(&file)?);
            print!("{text}");
        }
        Commands::Blocks { file } => {
            let text = normalize_bytes(&read_bytes(&file)?);
            let blocks = parse_blocks(&text);
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        Commands::Assemble(args) => {
            let inputs = ReportInputs::load(&args)?;
            let service = ReportService::new(config);
            println!("{}", service.assemble_json(&inputs.request(&args)?)?);
        }
        Commands::Preview(args) => {
            let inputs = ReportInputs::load(&args)?;
            let fonts = FallbackFontProvider::new(
                FileSystemRegistry::new(),
                default_chain(config.font_dir()),
            );
            let service = ReportService::new(config);
            let document = service.assemble(&inputs.request(&args)?);
            print!("{}", TextRenderer::new().render(&document, &fonts));
        }
    }

    Ok(())
}

/// Resolve configuration from the environment once at startup.
fn config_from_env() -> anyhow::Result<ReportConfig> {
    let locale = locale_from_env_value(std::env::var("REPORT_LOCALE").ok())?;
    let logo_ref = std::env::var("REPORT_LOGO_REF").ok();
    let brand = std::env::var("REPORT_BRAND").unwrap_or_else(|_| DEFAULT_BRAND.into());
    let font_dir = std::env::var("REPORT_FONT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FONT_DIR));

    Ok(ReportConfig::new(locale, logo_ref, brand, font_dir)?)
}

struct ReportInputs {
    record: FieldRecord,
    analysis: Option<String>,
}

impl ReportInputs {
    fn load(args: &ReportArgs) -> anyhow::Result<Self> {
        let record = load_record(&args.record)?;
        let analysis = args
            .analysis
            .as_deref()
            .map(|path| read_bytes(path).map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
            .transpose()?;
        Ok(Self { record, analysis })
    }

    fn request<'a>(&'a self, args: &'a ReportArgs) -> anyhow::Result<ReportRequest<'a>> {
        let locale = args
            .locale
            .as_deref()
            .map(str::parse::<Locale>)
            .transpose()?;
        Ok(ReportRequest {
            kind: args.kind,
            record: &self.record,
            analysis_text: self.analysis.as_deref(),
            locale,
            logo_ref: args.logo.as_deref(),
        })
    }
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_record(path: &Path) -> anyhow::Result<FieldRecord> {
    let bytes = read_bytes(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let record = if is_yaml {
        FieldRecord::from_yaml(&content)
    } else {
        FieldRecord::from_json(&content)
    };
    record.with_context(|| format!("invalid field record in {}", path.display()))
}
