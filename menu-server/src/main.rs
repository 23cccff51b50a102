use menu_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env and logging
    setup_environment()?;
    print_banner();

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        port = config.http_port,
        "Menu server starting..."
    );

    // 3. Storage and services
    let state = ServerState::initialize(&config)?;

    // 4. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
