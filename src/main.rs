use nanoserve::config::Config;
use nanoserve::http::response::set_output_encoding;
use nanoserve::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    set_output_encoding(cfg.output_encoding.as_deref());

    let mut server = Server::from_config(&cfg).await?;
    tracing::info!(
        root = %cfg.static_files.root.display(),
        listing = cfg.static_files.directory_listing,
        "Serving files on http://{}",
        server.local_addr()
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.stop().await;

    Ok(())
}
