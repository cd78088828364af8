// region:    --- Imports
use tracing::{error, info};
use wizards_bay::config::AppConfig;
use wizards_bay::state::AppState;
use wizards_bay::{handlers, server};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env has to be loaded before the subscriber reads RUST_LOG
    let config = AppConfig::from_env();
    server::init_tracing();

    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("{:<12} --> database initialization failed: {:?}", "Main", e);
            return Err(e.into());
        }
    };
    info!("{:<12} --> state ready", "Main");

    let routes_all = handlers::router(state);

    if let Err(err) = server::serve(routes_all, &config.bind_address).await {
        error!("{:<12} --> Server error: {}", "Main", err);
        return Err(err.into());
    }
    Ok(())
}
// endregion: --- Main
