//! Account client entry-point.

use std::io;

use account_client::{ClientSettings, HttpAccountApi, TerminalPrompt, shell};
use ortho_config::OrthoConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = ClientSettings::load().map_err(io::Error::other)?;
    let api = HttpAccountApi::new(&settings).map_err(io::Error::other)?;
    let mut prompt = TerminalPrompt::new().map_err(io::Error::other)?;

    shell::run(&api, &mut prompt).await.map_err(|err| {
        error!(error = %err, "client stopped");
        io::Error::other(err)
    })
}
