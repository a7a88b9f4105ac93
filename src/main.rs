use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = sentiment_dashboard::config::Settings::from_env()?;
    sentiment_dashboard::logging::init(&settings.log_level);

    sentiment_dashboard::app::run(settings).await
}
