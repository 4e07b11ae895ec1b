//! Agent Hub entry point
//!
//! - `agent-hub` / `agent-hub serve` - Start the HTTP server
//! - `agent-hub run <question>` - Process one question and print its context
//! - `agent-hub simulate` - Push mock submissions to a running hub
//! - `agent-hub init` - Write hub.toml and .env.example
//! - `agent-hub config` - Show or validate the configuration

use agent_hub::{
    build_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::{Mark, Output},
        run::{self, RunOptions},
        simulate::{self, SimulateOptions},
        Cli, Commands,
    },
    utils::toml_config::{HubConfig, LogFormat},
    AppState,
};
use anyhow::Context as _;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::new(!cli.no_color);

    match cli.command {
        Some(Commands::Init { path, force }) => {
            return match init::run(InitConfig { path, force }, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            };
        }
        Some(Commands::Config { validate }) => {
            return show_config(&cli.config, validate, &output);
        }
        _ => {}
    }

    let config = HubConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Some(Commands::Run {
            question,
            output: path,
            mock,
        }) => {
            let options = RunOptions {
                question,
                output: path,
                mock,
            };
            run::run(config, options, &output).await?;
            Ok(())
        }
        Some(Commands::Simulate {
            base_url,
            question,
            api_key,
        }) => {
            let options = SimulateOptions {
                base_url,
                question,
                api_key,
            };
            simulate::run(config, options, &output).await?;
            Ok(())
        }
        _ => serve(config, &output).await,
    }
}

fn init_tracing(config: &HubConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("agent_hub={0},tower_http={0}", default_level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(config: HubConfig, output: &Output) -> anyhow::Result<()> {
    for warning in config.validate_with_warnings()? {
        tracing::warn!("{}", warning);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config);
    let app = build_router(state);

    output.banner();
    output.field("Listening", &format!("http://{}", addr));
    output.field("Real agents", &format!("http://{}/real-agents", addr));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}

fn show_config(path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = HubConfig::load_or_default(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    output.section("Configuration");
    output.field("File", &path.display().to_string());
    output.field(
        "Server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.field(
        "Key management",
        if config.admin_password().is_some() {
            "enabled"
        } else {
            "disabled"
        },
    );

    output.section("Agents");
    output.agent_table(&config.agents);

    if validate {
        output.section("Validation");
        let warnings = config.validate_with_warnings()?;
        for warning in &warnings {
            output.line(Mark::Warn, &warning.message);
        }
        if warnings.is_empty() {
            output.line(Mark::Done, "Configuration is valid");
        } else {
            output.line(
                Mark::Done,
                &format!("Configuration is valid ({} warnings)", warnings.len()),
            );
        }
    }
    Ok(())
}
