use crate::{classifiers::Classifiers, config::Config, server::HttpServer};
use tokio::{signal, sync::broadcast};

pub async fn start_app(config: Config) -> anyhow::Result<()> {
    let models = config.models.clone();
    let classifiers = match tokio::task::spawn_blocking(move || Classifiers::load(&models)).await? {
        Ok(classifiers) => classifiers,
        Err(e) => {
            tracing::error!("Failed to load models: {}", e);
            return Err(e.into());
        }
    };

    let server = HttpServer::new(classifiers, &config).await?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let server_handle = server.run(shutdown_tx.subscribe()).await?;

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown.");

    let _ = shutdown_tx.send(());
    server_handle.await??;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
