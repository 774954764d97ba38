use std::net::SocketAddr;
use std::process::ExitCode;

use askdb_configuration::{ProcessEnvironment, ServerConfiguration};

#[tokio::main]
async fn main() -> ExitCode {
    askdb::logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // Missing database address or model credential fails here, at startup,
    // never per-request.
    let configuration = ServerConfiguration::from_environment(ProcessEnvironment)?;
    let port = configuration.port;

    let state = askdb::state::create_state(configuration)?;
    let app = askdb::router(state);

    let address = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%address, "starting askdb server");

    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
