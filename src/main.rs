#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]

mod app;
mod config;
mod logging;
mod store;

use confy::ConfyError;

use app::App;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config")]
    Load(#[from] ConfyError),

    #[error("api_url is not set; add it to the {} config file or pass --api-url", config::BIN_NAME)]
    MissingApiUrl,

    #[error(transparent)]
    Api(#[from] teller_lib::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[tokio::main]
async fn main() {
    let app = App::from_cli();

    if let Err(e) = app.run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
