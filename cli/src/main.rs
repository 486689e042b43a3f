use carebook_cli::commands::{self, cli};
use carebook_core::api::{self as core_api, AppContext, CliError};
use carebook_plugins::services::PluginServicesFactory;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg = core_api::load_default()?;
    if let Some(url) = args.api_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.backend.base_url = url.to_string();
        core_api::validate(&cfg)?;
    }
    init_tracing(&cfg.logging).map_err(|e| CliError::Anyhow(anyhow::anyhow!(e)))?;
    tracing::debug!(
        target: "carebook.cli",
        stage = "config.loaded",
        base_url = %cfg.backend.base_url
    );

    let ctx = AppContext::new(cfg, Some(Arc::new(PluginServicesFactory)));
    dispatch(args.command, args.format, ctx).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: backend unreachable / request failed / IO error
    // 30: invalid input or not signed in
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Unavailable(_) => 20,
        CliError::Backend(_) => 20,
        CliError::Io(_) => 20,
        CliError::Validation(_) => 30,
        CliError::NotAuthenticated(_) => 30,
        CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(
    cmd: cli::Commands,
    format: cli::OutputFormat,
    ctx: AppContext,
) -> Result<i32, CliError> {
    match cmd {
        cli::Commands::Status => commands::browse::handle_status(format, &ctx).await,
        cli::Commands::Departments(a) => commands::browse::handle_departments(a, format),
        cli::Commands::Doctors(a) => commands::browse::handle_doctors(a, format, &ctx).await,
        cli::Commands::Slots(a) => commands::browse::handle_slots(a, format, &ctx).await,
        cli::Commands::Register(a) => commands::patient::handle_register(a, format, &ctx).await,
        cli::Commands::Book(a) => commands::patient::handle_book(a, format, &ctx).await,
        cli::Commands::Appointments(a) => {
            commands::patient::handle_appointments(a, format, &ctx).await
        }
        cli::Commands::Admin(a) => commands::admin::handle_admin(a, format, &ctx).await,
        cli::Commands::Shell => commands::shell::handle_shell(&ctx).await,
    }
}

/// Target prefix shared by every `carebook.*` event and the `carebook_*` crates.
const LOG_TARGET_PREFIX: &str = "carebook";

/// `logging.level` applies to this client's own targets; dependencies
/// (reqwest, hyper, rustls) stay at `warn`. A level that already carries
/// directives (`a=b,c`) is used verbatim.
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let level = if level.is_empty() { "info" } else { level };
    format!("warn,{LOG_TARGET_PREFIX}={level}")
}

fn init_tracing(logging: &core_api::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }
    if !logging.console && !logging.file {
        return Err("logging enabled but both console and file outputs are off".to_string());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter_directives(&logging.level)).map_err(|e| e.to_string())?,
    };

    let file_layer = if logging.file {
        let dir = logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(std::path::PathBuf::from)
            .or_else(|| {
                core_api::get_carebook_data_dir()
                    .ok()
                    .map(|d| d.join("logs"))
            })
            .unwrap_or_else(|| std::env::temp_dir().join("carebook"));
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;

        // One file per day; the shell can stay open across midnight.
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "carebook.log"));
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    } else {
        None
    };

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .without_time()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
