use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use drill_core::model::{
    DEFAULT_BATCH_SIZE, GeneratorPolicy, PairMatch, QuizSettings, SettingsError, StepInputMode,
};
use env_logger::Env;
use log::info;
use services::{AppServices, Clock, QuizLoopService};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://drill.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidMode { raw: String },
    InvalidGenerator { raw: String },
    InvalidBatchSize { raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidMode { raw } => {
                write!(f, "invalid --mode value: {raw} (expected direct, confirm or confirm-any)")
            }
            ArgsError::InvalidGenerator { raw } => {
                write!(f, "invalid --generator value: {raw} (expected targeted or uniform)")
            }
            ArgsError::InvalidBatchSize { raw } => write!(f, "invalid --batch-size value: {raw}"),
            ArgsError::Settings(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SettingsError> for ArgsError {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    share_link: Option<String>,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn share_link(&self) -> Option<String> {
        self.share_link.clone()
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    settings: QuizSettings,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--mode <mode>] [--generator <policy>]");
    eprintln!("                      [--batch-size <n>] [--share-link <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --mode direct          (direct | confirm | confirm-any)");
    eprintln!("  --generator targeted   (targeted | uniform)");
    eprintln!("  --batch-size {DEFAULT_BATCH_SIZE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_DB_URL, DRILL_INPUT_MODE, DRILL_GENERATOR, DRILL_BATCH_SIZE, DRILL_SHARE_LINK");
    eprintln!("  RUST_LOG (default: info)");
}

fn parse_mode(raw: &str) -> Result<StepInputMode, ArgsError> {
    match raw.trim() {
        "direct" => Ok(StepInputMode::Direct),
        "confirm" => Ok(StepInputMode::ConfirmPair(PairMatch::Positional)),
        "confirm-any" => Ok(StepInputMode::ConfirmPair(PairMatch::Unordered)),
        _ => Err(ArgsError::InvalidMode {
            raw: raw.to_string(),
        }),
    }
}

fn parse_generator(raw: &str) -> Result<GeneratorPolicy, ArgsError> {
    match raw.trim() {
        "targeted" => Ok(GeneratorPolicy::targeted()),
        "uniform" => Ok(GeneratorPolicy::uniform()),
        _ => Err(ArgsError::InvalidGenerator {
            raw: raw.to_string(),
        }),
    }
}

fn parse_batch_size(raw: &str) -> Result<usize, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidBatchSize {
        raw: raw.to_string(),
    })
}

impl Args {
    /// Environment values are read first; flags override them.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("DRILL_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url);
        let mut mode = env("DRILL_INPUT_MODE")
            .as_deref()
            .map(parse_mode)
            .transpose()?
            .unwrap_or_default();
        let mut generator = env("DRILL_GENERATOR")
            .as_deref()
            .map(parse_generator)
            .transpose()?
            .unwrap_or_default();
        let mut batch_size = env("DRILL_BATCH_SIZE")
            .as_deref()
            .map(parse_batch_size)
            .transpose()?
            .unwrap_or(DEFAULT_BATCH_SIZE);
        let mut share_link = env("DRILL_SHARE_LINK");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--mode" => mode = parse_mode(&require_value(args, "--mode")?)?,
                "--generator" => generator = parse_generator(&require_value(args, "--generator")?)?,
                "--batch-size" => batch_size = parse_batch_size(&require_value(args, "--batch-size")?)?,
                "--share-link" => share_link = Some(require_value(args, "--share-link")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let mut settings = QuizSettings::new(batch_size, mode, generator)?;
        if let Some(link) = share_link.filter(|link| !link.trim().is_empty()) {
            settings = settings.with_share_link(link.trim())?;
        }

        Ok(Self { db_url, settings })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let share_link = parsed.settings.share_link().map(ToString::to_string);
    info!(
        "opening {} (batch size {}, {:?})",
        parsed.db_url,
        parsed.settings.batch_size(),
        parsed.settings.input_mode()
    );
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default(), parsed.settings).await?;

    let app = DesktopApp {
        quiz_loop: services.quiz_loop(),
        share_link,
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("GCD Drill")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
