#[tokio::main]
async fn main() -> chillax::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("chillax=info,serenity=warn"),
    )
    .init();
    log::info!("Starting chillax Discord bot");

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        log::warn!("A rustls crypto provider was already installed");
    }

    match chillax::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
