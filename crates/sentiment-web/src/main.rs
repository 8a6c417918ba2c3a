use clap::Parser;
use sentiment_web::cli::{Cli, Commands};
use sentiment_web::config::{ConfigOverrides, SurfaceConfig};
use sentiment_web::runner::analyze_once;
use sentiment_web::server::run_server;
use sentiment_web::state::SurfaceAppState;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            address,
            model,
        } => {
            init_logging(model.verbose);

            let overrides = ConfigOverrides {
                address,
                port,
                ..model.overrides()
            };
            let config = SurfaceConfig::load(&model.config, &overrides)?;
            let addr: SocketAddr =
                format!("{}:{}", config.server.address, config.server.port).parse()?;

            println!();
            println!("  Sentiment Analyser");
            println!();
            println!("  Backend: {}", config.backend);
            println!("  Model:   {}", config.model.id);
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(SurfaceAppState::from_config(config), addr).await?;
        }

        Commands::Analyze { text, model } => {
            init_logging(model.verbose);

            let config = SurfaceConfig::load(&model.config, &model.overrides())?;
            let backend = sentiment_classifiers::build_backend(config.backend, &config.model);

            let report = analyze_once(config, backend, &text).await?;
            match report.outcome.result() {
                Some(_) => println!("{}", report.render()),
                None => eprintln!("{}", sentiment_web::models::ANALYZE_NOTICE),
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "sentiment_web=debug,sentiment_classifiers=debug,tower_http=debug"
    } else {
        "sentiment_web=info,sentiment_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
