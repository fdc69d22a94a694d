use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use uk_store::FsStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::info::HostInfo;
use crate::router::build_router;
use crate::state::AppState;

/// Utility Knife HTTP server.
pub struct UkServer {
    config: ServerConfig,
}

impl UkServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the store and assemble the application state.
    pub fn state(&self, host: HostInfo) -> ServerResult<AppState> {
        let store = FsStore::open(self.config.store_config())?;
        Ok(AppState::new(Arc::new(store), host, &self.config))
    }

    /// Start serving requests until SIGINT or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_router(self.state(HostInfo::detect())?);
        let addr = listener.local_addr()?;
        tracing::info!(
            %addr,
            data_dir = %self.config.data_dir.display(),
            lock_mode = %self.config.lock_mode,
            "listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("done");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn server_construction() {
        let server = UkServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "0.0.0.0:80".parse().unwrap());
    }

    #[test]
    fn state_opens_store_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("kv");
        let server = UkServer::new(ServerConfig {
            data_dir: data_dir.clone(),
            ..ServerConfig::default()
        });
        let state = server.state(HostInfo::new("h", "127.0.0.1")).unwrap();
        assert!(data_dir.is_dir());
        assert_eq!(state.max_body_size, 32 * 1024 * 1024);
    }

    #[tokio::test]
    async fn serves_over_tcp_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let server = UkServer::new(ServerConfig {
            data_dir: dir.path().to_path_buf(),
            ..ServerConfig::default()
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(listener, async move {
            let _ = rx.await;
        }));

        let put = roundtrip(
            addr,
            concat!(
                "PUT /data/hello HTTP/1.1\r\nHost: test\r\nContent-Type: text/plain\r\n",
                "Content-Length: 5\r\nConnection: close\r\n\r\nworld",
            ),
        )
        .await;
        assert!(put.starts_with("HTTP/1.1 201"), "{put}");

        let get = roundtrip(
            addr,
            "GET /data/hello HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(get.starts_with("HTTP/1.1 200"), "{get}");
        assert!(get.contains("content-type: text/plain\r\n"), "{get}");
        assert!(get.contains("x-served-by: weters/utilityknife\r\n"), "{get}");
        assert!(get.ends_with("world"), "{get}");

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
