//! Server execution logic.

use std::{future::Future, io, sync::Arc};

use axum::{Router, routing::get};
use tcp_chat_shared::time::Clock;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    infrastructure::banner::Banner,
    usecase::{GetChatStatusUseCase, JoinChatUseCase, LeaveChatUseCase, SendMessageUseCase},
};

use super::{
    handler::{get_status, handle_connection, health_check},
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// TCP chat server
///
/// This struct encapsulates the server state and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_chat_usecase,
///     send_message_usecase,
///     leave_chat_usecase,
///     get_chat_status_usecase,
///     Banner::default(),
///     Arc::new(SystemClock),
/// );
/// server.run("0.0.0.0", 8989, None).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        join_chat_usecase: Arc<JoinChatUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        leave_chat_usecase: Arc<LeaveChatUseCase>,
        get_chat_status_usecase: Arc<GetChatStatusUseCase>,
        banner: Banner,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                join_chat_usecase,
                send_message_usecase,
                leave_chat_usecase,
                get_chat_status_usecase,
                banner,
                clock,
            }),
        }
    }

    /// Run the chat server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The chat port (e.g., 8989)
    /// * `status_port` - Port of the optional HTTP status endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if either listener fails to bind.
    pub async fn run(
        self,
        host: &str,
        port: u16,
        status_port: Option<u16>,
    ) -> Result<(), ServerError> {
        let listener = bind(host, port).await?;
        println!("Listening on the port :{}", port);
        tracing::info!("TCP chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect with: nc {} {}", host, port);

        if let Some(status_port) = status_port {
            let status_listener = bind(host, status_port).await?;
            tracing::info!(
                "Status endpoint listening on http://{}/api/status",
                status_listener.local_addr()?
            );
            let router = self.status_router();
            tokio::spawn(async move {
                if let Err(e) = axum::serve(status_listener, router)
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                {
                    tracing::error!("Status endpoint error: {}", e);
                }
            });
        }

        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Every accepted connection gets its own task; a failed accept is logged
    /// and the loop keeps going.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tokio::spawn(handle_connection(stream, peer, self.state.clone()));
                    }
                    Err(e) => tracing::warn!("Error accepting connection: {}", e),
                },
            }
        }
    }

    /// Read-only HTTP endpoints for operators
    pub fn status_router(&self) -> Router {
        Router::new()
            .route("/api/health", get(health_check))
            .route("/api/status", get(get_status))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }
}

async fn bind(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}
