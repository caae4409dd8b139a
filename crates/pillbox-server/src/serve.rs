use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pillbox_db::DocumentStore;

/// Serve `app` until `shutdown` resolves, then give in-flight requests
/// `grace` to finish before aborting the server. The store is closed on
/// every exit path.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()>,
    grace: Duration,
    store: Arc<dyn DocumentStore>,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let drain = token.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.cancelled().await })
            .await
    });

    let outcome = tokio::select! {
        result = &mut server => joined(result),
        _ = shutdown => {
            token.cancel();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => joined(result),
                Err(_) => {
                    warn!(
                        "Drain window of {:?} elapsed, dropping in-flight requests",
                        grace
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    store.close()?;
    info!("Server shut down");
    outcome
}

fn joined(result: Result<std::io::Result<()>, JoinError>) -> anyhow::Result<()> {
    Ok(result??)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use axum::routing::get;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::{Notify, oneshot};

    use pillbox_db::{Database, PrescriptionFilter, StoreError};

    use super::*;

    /// A router whose only route signals `started` and then sleeps for `work`.
    fn slow_app(started: Arc<Notify>, work: Duration) -> Router {
        Router::new().route(
            "/slow",
            get(move || {
                let started = started.clone();
                async move {
                    started.notify_one();
                    tokio::time::sleep(work).await;
                    "done"
                }
            }),
        )
    }

    async fn start(
        app: Router,
        grace: Duration,
    ) -> (
        std::net::SocketAddr,
        Arc<dyn DocumentStore>,
        oneshot::Sender<()>,
        tokio::task::JoinHandle<anyhow::Result<()>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(Database::open_in_memory().unwrap());
        let (stop, stopped) = oneshot::channel::<()>();

        let serving = tokio::spawn(serve_until(
            listener,
            app,
            async move {
                stopped.await.ok();
            },
            grace,
            store.clone(),
        ));

        (addr, store, stop, serving)
    }

    async fn send_slow_request(addr: std::net::SocketAddr) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        stream
    }

    fn assert_closed(store: &Arc<dyn DocumentStore>) {
        let err = store
            .find_all(&PrescriptionFilter::by_owner("alice"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Closed));
    }

    #[tokio::test]
    async fn in_flight_request_finishes_within_the_drain_window() {
        let started = Arc::new(Notify::new());
        let app = slow_app(started.clone(), Duration::from_millis(200));
        let (addr, store, stop, serving) = start(app, Duration::from_secs(5)).await;

        let mut stream = send_slow_request(addr).await;
        started.notified().await;
        stop.send(()).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.ends_with("done"), "{response}");

        serving.await.unwrap().unwrap();
        assert_closed(&store);
    }

    #[tokio::test]
    async fn drain_window_expiry_aborts_the_server_and_still_closes_the_store() {
        let started = Arc::new(Notify::new());
        let app = slow_app(started.clone(), Duration::from_secs(30));
        let (addr, store, stop, serving) = start(app, Duration::from_millis(100)).await;

        let _stream = send_slow_request(addr).await;
        started.notified().await;

        let stopping = Instant::now();
        stop.send(()).unwrap();
        serving.await.unwrap().unwrap();

        assert!(stopping.elapsed() < Duration::from_secs(5));
        assert_closed(&store);
    }

    #[tokio::test]
    async fn idle_server_stops_on_signal() {
        let app = slow_app(Arc::new(Notify::new()), Duration::ZERO);
        let (_, store, stop, serving) = start(app, Duration::from_secs(1)).await;

        stop.send(()).unwrap();
        serving.await.unwrap().unwrap();
        assert_closed(&store);
    }
}
