pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod pipeline;
pub mod state;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting picnote");

    let config = config::load_app_config();
    let mut app = app::App::new(config);
    app.start()?;

    tracing::info!("shutdown complete");
    Ok(())
}
