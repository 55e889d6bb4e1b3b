mod app;
mod client;
mod config;
mod error;
mod export;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // Stdout belongs to the terminal UI, so tracing goes to a file when asked.
    if let Some(log_file) = config.log_file.as_deref() {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter("caparra_tui=info,engine=info")
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
