use lab_server::{setup_environment, Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Lab server starting...");

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize server state (database, JWT)
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
