#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use font_injector::constants::paths;
use font_injector::converter::{self, ConverterStyle, FontFile};
use font_injector::font::list_fonts;
use font_injector::host::{FsStorage, JsonSettings, LiveDocument, LogNotifier, SettingsStore};
use font_injector::{FontEngine, FontSelection, PassOutcome, PresentationConfig};

#[derive(Parser)]
#[command(version, about = "Apply local font files as the vault's UI and editor font")]
struct Cli {
    /// Vault root; fonts, settings and cache paths are relative to it
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List fonts available in the font directory
    List,
    /// Update the settings and write the resulting stylesheet
    Apply(ApplyArgs),
    /// Remove every injected style
    Clear {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert font files to CSS without touching the vault
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ApplyArgs {
    /// Font file name inside the font directory
    #[arg(long, conflicts_with = "all")]
    font: Option<String>,

    /// Apply every font in the font directory
    #[arg(long)]
    all: bool,

    /// Force the font onto every element with !important
    #[arg(long, conflicts_with = "no_force")]
    force: bool,

    #[arg(long)]
    no_force: bool,

    /// Use this CSS instead of the default theme variables
    #[arg(long, conflicts_with = "no_custom_css")]
    custom_css: Option<String>,

    #[arg(long)]
    no_custom_css: bool,

    /// Stylesheet to write (default: the vault's custom-font snippet)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ConvertArgs {
    /// Font files (.woff, .ttf, .woff2, .otf)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Styling template: "default", "custom" or "force"
    #[arg(long, default_value = "default")]
    style: ConverterStyle,

    /// Selector for the custom template
    #[arg(long)]
    selector: Option<String>,

    /// Output file or directory (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ApplyArgs {
    /// Overlay the flags onto the stored settings
    fn merge_into(&self, config: &mut PresentationConfig) {
        if let Some(font) = &self.font {
            config.font = FontSelection::from(font.clone());
        } else if self.all {
            config.font = FontSelection::AllFonts;
        }
        if self.force {
            config.force_mode = true;
        } else if self.no_force {
            config.force_mode = false;
        }
        if let Some(css) = &self.custom_css {
            config.custom_css_enabled = true;
            config.custom_css = css.clone();
        } else if self.no_custom_css {
            config.custom_css_enabled = false;
        }
    }
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Write the rendered document, creating parent directories as needed
async fn write_stylesheet(path: &Path, css: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(path, css)
        .await
        .with_context(|| format!("Failed to write stylesheet to {}", path.display()))?;
    info!(path = %path.display(), bytes = css.len(), "Wrote stylesheet");
    Ok(())
}

fn output_path(vault: &Path, output: Option<&PathBuf>) -> PathBuf {
    output.cloned().unwrap_or_else(|| vault.join(paths::SNIPPET_FILE))
}

/// Save `config`, run a pass and write whatever the slots hold
async fn run_pass(vault: &Path, config: &PresentationConfig, output: Option<&PathBuf>) -> Result<()> {
    let storage = FsStorage::new(vault);
    let settings = JsonSettings::new(storage.clone());
    let engine = FontEngine::new(storage, LiveDocument::new(), LogNotifier);

    match engine.update(&settings, config).await {
        PassOutcome::Failed(message) => bail!(message),
        PassOutcome::Applied { families, cache_hits } => {
            println!("Applied {} font(s): {} ({} cached)", families.len(), families.join(", "), cache_hits);
        }
        PassOutcome::Cleared => println!("Cleared custom fonts"),
        PassOutcome::Superseded => {}
    }

    write_stylesheet(&output_path(vault, output), &engine.document().render()).await
}

async fn list(vault: &Path) -> Result<()> {
    let storage = FsStorage::new(vault);
    let config = JsonSettings::new(storage.clone())
        .load()
        .await
        .context("Failed to load settings")?;

    let fonts = list_fonts(&storage, &config.font_dir)
        .await
        .with_context(|| format!("Failed to scan {}", vault.join(&config.font_dir).display()))?;

    if fonts.is_empty() {
        println!("No fonts found in {}", config.font_dir);
    }
    for font in fonts {
        let marker = match &config.font {
            FontSelection::Single(name) if *name == font.file_name => "*",
            FontSelection::AllFonts => "*",
            _ => " ",
        };
        println!("{} {} ({})", marker, font.file_name, font.family_name);
    }
    Ok(())
}

async fn apply(vault: &Path, args: &ApplyArgs) -> Result<()> {
    let mut config = JsonSettings::new(FsStorage::new(vault))
        .load()
        .await
        .context("Failed to load settings")?;
    args.merge_into(&mut config);
    info!(font = %config.font, force = config.force_mode, custom = config.custom_css_enabled, "Applying settings");
    run_pass(vault, &config, args.output.as_ref()).await
}

async fn clear(vault: &Path, output: Option<&PathBuf>) -> Result<()> {
    let mut config = JsonSettings::new(FsStorage::new(vault))
        .load()
        .await
        .context("Failed to load settings")?;
    config.font = FontSelection::None;
    run_pass(vault, &config, output).await
}

async fn convert(args: &ConvertArgs) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        files.push(FontFile::new(name, bytes));
    }

    let style = match &args.style {
        ConverterStyle::Custom(_) => ConverterStyle::Custom(args.selector.clone().unwrap_or_default()),
        other => other.clone(),
    };
    let css = converter::convert_files(&files, &style)?;

    match &args.output {
        None => println!("{}", css),
        Some(path) => {
            let is_dir = tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false);
            let target = if is_dir {
                path.join(converter::download_name(&files))
            } else {
                path.clone()
            };
            write_stylesheet(&target, &css).await?;
            println!("CSS file saved as {}", target.display());
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match &cli.command {
        Command::List => list(&cli.vault).await,
        Command::Apply(args) => apply(&cli.vault, args).await,
        Command::Clear { output } => clear(&cli.vault, output.as_ref()).await,
        Command::Convert(args) => convert(args).await,
    }
}
