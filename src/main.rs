use anyhow::Context;
use unfail_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Unfail settings")?;
    unfail_telemetry::init(&settings.telemetry).ok();

    tracing::info!(
        env = ?settings.environment,
        model = %settings.gemini.model,
        "unfail-app bootstrap starting"
    );

    unfail_app::serve(&settings).await
}
