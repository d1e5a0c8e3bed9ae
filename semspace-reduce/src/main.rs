use clap::Parser;
use semspace_core::Reducer;
use semspace_reduce::cli::Args;
use semspace_reduce::{logging, ReduceService};
use tokio::io::BufReader;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: semspace-reduce panicked");
        eprintln!(
            "  Location: {}",
            panic_info
                .location()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        eprintln!(
            "  Message: {}",
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .unwrap_or(&"<no message>")
        );
    }));

    let args = Args::parse();
    logging::init_with_filter(args.log_filter());

    let config = args.resolve_config()?;

    info!("Initializing semspace reduce service");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "  Seed: {} | Dimensions: {} | Scale: {}/{}",
        config.seed, config.dimensions, config.projection_scale, config.simple_scale
    );

    let reducer = Reducer::new(config)?;
    let service = ReduceService::new(reducer);

    info!("Ready to receive reduction requests on stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = service.serve(stdin, stdout) => {
            result?;
        }
        _ = shutdown_signal() => {}
    }

    info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
