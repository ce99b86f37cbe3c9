use innovatehub_service::api;
use innovatehub_service::common::init;
use innovatehub_service::settings::AppSettings;
use innovatehub_service::workers::crons;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        "lifecycle-cron" => crons::lifecycle_cron::serve(settings).await,
        component => anyhow::bail!("Unknown app component: {component}"),
    }
}
