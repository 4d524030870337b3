use qtoday::WebScraper;
use qtoday_web::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .write_style(env_logger::WriteStyle::Never)
        .init();

    let config = Config::from_env()?;
    log::debug!("Loaded config: {:?}", config);

    let scraper = WebScraper::with_config(config.scraper)?;
    let router = qtoday_web::router(scraper);
    let tcp_listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    log::info!(
        "Serving devotionals on http://{}/today.json",
        config.bind_address
    );

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {e}");
            }
            log::info!("Shutting down");
        })
        .await?;

    Ok(())
}
