use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AbortSignal, AdminService, ApiConfig, GameService, TriviaApi};
use tracing_subscriber::fmt::format::FmtSpan;
use ui::{App, UiApp, build_app_context};

const DEFAULT_LOG_FILTER: &str = "services=info,ui=info,app=info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiBase { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiBase { raw } => write!(f, "invalid --api-base value: {raw}"),
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --timeout-secs value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    game: Arc<GameService>,
    admin: Arc<AdminService>,
    open_admin_on_launch: bool,
}

impl UiApp for DesktopApp {
    fn open_admin_on_launch(&self) -> bool {
        self.open_admin_on_launch
    }

    fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }

    fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}

struct Args {
    config: ApiConfig,
    open_admin: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--api-base <url>] [--timeout-secs <n>] [--admin]");
    eprintln!("  cargo run -p app -- health [--api-base <url>] [--timeout-secs <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-base /api (resolved against TRIVIA_ORIGIN, default http://localhost:8000)");
    eprintln!("  --timeout-secs 15");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_API_BASE_URL, TRIVIA_ORIGIN, TRIVIA_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Health,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "health" => Some(Self::Health),
            _ => None,
        }
    }
}

impl Args {
    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = ApiConfig::from_env();
        let mut open_admin = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-base" => {
                    let value = require_value(args, "--api-base")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiBase { raw: value });
                    }
                    config = config.with_base_url(value.trim());
                }
                "--timeout-secs" => {
                    let value = require_value(args, "--timeout-secs")?;
                    let secs: u64 = value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    config = config.with_timeout(Duration::from_secs(secs));
                }
                "--admin" if cmd == Command::Ui => open_admin = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        // Fail on a bad base before any window opens.
        config
            .endpoint("/")
            .map_err(|_| ArgsError::InvalidApiBase {
                raw: config.base_url.clone(),
            })?;

        Ok(Self { config, open_admin })
    }
}

fn init_tracing() {
    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    match cmd {
        Command::Ui => {
            tracing::info!(
                base_url = %parsed.config.base_url,
                timeout_secs = parsed.config.timeout.as_secs(),
                "launching trivia client"
            );
            let api = Arc::new(TriviaApi::from_config(parsed.config.clone()));
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                game: Arc::new(GameService::from_config(parsed.config)),
                admin: Arc::new(AdminService::new(api)),
                open_admin_on_launch: parsed.open_admin,
            });

            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Trivia")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Health => {
            let api = TriviaApi::from_config(parsed.config);
            let body = api.health(AbortSignal::never()).await?;
            println!("{body}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
