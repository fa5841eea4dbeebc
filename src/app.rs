use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

pub fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load()?;
    let state = crate::infrastructure::bootstrap::setup(&config)?;
    let bind = config.bind_address();

    actix_web::rt::System::new().block_on(async move {
        let server = crate::interfaces::http::start_server(state, bind.clone())?;
        info!(host = %bind.0, port = bind.1, "SentiScope listening");
        server.await
    })?;

    Ok(())
}
