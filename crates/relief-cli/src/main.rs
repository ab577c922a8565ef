mod app;
mod cli;
mod repl;
mod terminal;

use std::process::ExitCode;

use relief_common::ConfigError;
use relief_config::schema::ReliefConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Args, Command};

/// `KEY=VALUE` pairs from dotenv text. Blank lines, `#` comments and lines
/// without `=` are skipped; an `export ` prefix and surrounding quotes are
/// dropped.
fn dotenv_pairs(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.trim(), value))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Fill unset variables (`RELIEF_API_BASE`, `RELIEF_PASSWORD`, `RUST_LOG`)
/// from `./.env`. Runs before any threads exist.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for (key, value) in dotenv_pairs(&contents) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
        }
    }
}

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit config paths must load; the default path falls back to defaults.
fn load_config(args: &Args) -> (Result<ReliefConfig, ConfigError>, Option<ConfigError>) {
    match args.config {
        Some(ref path) => (relief_config::load_config(Some(path.as_path())), None),
        None => match relief_config::load_config(None) {
            Ok(config) => (Ok(config), None),
            Err(e) => (Ok(ReliefConfig::default()), Some(e)),
        },
    }
}

fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();
    let (loaded, default_load_error) = load_config(&args);

    let config_directive = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("relief=info");
    init_logging(args.log_level.as_deref().unwrap_or(config_directive));

    tracing::debug!("relief v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(e) = default_load_error {
        tracing::warn!("config load failed, using defaults: {e}");
    }
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Some(base) = args.api_base.clone() {
        config.api.base_url = base;
        if let Err(e) = relief_config::validation::validate(&config) {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    }

    if matches!(args.command, Command::Config) {
        println!("{}", relief_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let app = match App::new(config) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        };

        let result = match args.command {
            Command::Login { email, password } => app.login(&email, password).await,
            Command::Register {
                email,
                full_name,
                password,
            } => app.register(&email, &full_name, password).await,
            Command::Logout => Ok(app.logout()),
            Command::Whoami => Ok(app.whoami().await),
            Command::Ask { question } => Ok(app.ask(&question.join(" ")).await),
            Command::Chat => repl::run(&app).await,
            Command::History => Ok(app.history().await),
            Command::Config => Ok(ExitCode::SUCCESS),
        };
        app.shutdown();

        result.unwrap_or_else(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    })
}
