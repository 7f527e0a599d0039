//! Sakai CLI and SSE API entry point.
//!
//! Binary name: `sakai`
//!
//! Parses CLI arguments, sets up tracing, builds the model from
//! configuration, then dispatches to the chat loop or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use sakai_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,sakai=debug",
        _ => "trace",
    };
    let options = TracingOptions {
        otel: cli.otel,
        json: cli.json,
        ..TracingOptions::new(filter)
    };
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Neither needs a model or an API key.
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "sakai", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Prompt { prompt, date } => {
            return cli::prompt::print_prompt(prompt, *date, cli.json);
        }
        _ => {}
    }

    let model_override = cli.model.clone();
    match cli.command {
        Commands::Chat {
            prompt,
            temperature,
            once,
        } => {
            let state = AppState::init(|config| {
                if let Some(model) = model_override {
                    config.model = model;
                }
            })
            .await?;

            let temperature = temperature.or(Some(state.config.temperature));
            let template = prompt.to_request(temperature);
            match once {
                Some(message) => cli::chat::loop_runner::run_once(&state, template, &message).await?,
                None => cli::chat::loop_runner::run_chat_loop(&state, template).await?,
            }
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(|config| {
                if let Some(model) = model_override {
                    config.model = model;
                }
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
            })
            .await?;

            let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Sakai API listening on {}",
                console::style("*").magenta().bold(),
                console::style(format!("http://{addr}/api/v1")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } | Commands::Prompt { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
