//! HTTP server startup and shutdown

use axum_server::Handle;
use std::net::SocketAddr;
use std::time::Duration;

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, ServerState};
use crate::services::https::build_app;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Use an already initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C, then drain connections and stop background tasks
    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        tasks.log_summary();

        let app = build_app(state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));

        let handle = Handle::new();
        let shutdown_handle = handle.clone();
        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        tracing::info!(%addr, "Menu server listening");
        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}
