//! HTTP server implementation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{RwLock, Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::signal;
use log::{debug, info, warn, error};

use crate::parser::{HttpRequest, Method, parse_request, request_len};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::handler::{HandlerFuture, Route};
use crate::server::response::{HttpResponse, StatusCode};

/// An HTTP server.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The routes, in registration order.
    pub routes: Arc<RwLock<Vec<Route>>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            routes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Add a route to the server.
    ///
    /// `path` may contain `{name}` segments; their values are available to the
    /// handler through [`HttpRequest::path_param`].
    pub async fn add_route<F, Fut>(&self, path: impl Into<String>, methods: Vec<Method>, handler: F)
    where
        F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
    {
        let path = path.into();
        let handler = Arc::new(move |req: HttpRequest| -> HandlerFuture { Box::pin(handler(req)) });

        let route = Route {
            path,
            methods,
            handler,
        };

        self.routes.write().await.push(route);
    }

    /// List the registered endpoints as `METHOD path` strings.
    pub async fn endpoints(&self) -> Vec<String> {
        let routes = self.routes.read().await;
        routes
            .iter()
            .flat_map(|route| route.methods.iter().map(move |m| format!("{m} {}", route.path)))
            .collect()
    }

    /// Log the registered endpoints.
    async fn display_server_info(&self) {
        info!("Registered endpoints:");
        for endpoint in self.endpoints().await {
            info!("  {endpoint}");
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::BindError { addr, source })?;
        info!("Server listening on http://{addr}");
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: Arc<mpsc::Sender<()>>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Take a connection slot for `socket` and serve it on `tasks`.
    ///
    /// When every slot is taken the peer gets a 503 and the socket is closed
    /// without reading the request.
    pub(crate) async fn handle_new_connection<S>(
        mut socket: S,
        peer: impl fmt::Display + Send + 'static,
        semaphore: Arc<Semaphore>,
        routes: Arc<RwLock<Vec<Route>>>,
        config: ServerConfig,
        tasks: &mut JoinSet<()>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let permit = match semaphore.try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {peer}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                let _ = socket.shutdown().await;
                return;
            }
        };

        tasks.spawn(async move {
            // Held until the connection is done
            let _permit = permit;

            match Self::handle_connection(&mut socket, routes, &config).await {
                Ok(()) => {}
                // Already answered, and the client's fault
                Err(
                    e @ (Error::NotFound(_)
                    | Error::MethodNotAllowed(..)
                    | Error::ParseError(_)
                    | Error::RequestTimeout(_)),
                ) => {
                    debug!("Rejected request from {peer}: {e}");
                }
                Err(e) => {
                    error!("Error handling connection from {peer}: {e}");
                }
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(Duration::from_millis(100)).await;
        false
    }

    /// Wait up to `shutdown_timeout` for in-flight connections, then abort
    /// the rest.
    pub(crate) async fn perform_shutdown(tasks: &mut JoinSet<()>, shutdown_timeout: Duration) {
        info!("Waiting for {len} active tasks to complete...", len = tasks.len());
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    if !e.is_cancelled() {
                        error!("Task failed during shutdown: {e}");
                    }
                }
            }
        }).await;

        if drained.is_err() {
            warn!("Shutdown timed out, aborting {len} remaining tasks", len = tasks.len());
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
        }

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info().await;

        let listener = self.setup_listener().await?;

        // Create a semaphore to limit concurrent connections
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        let mut tasks = JoinSet::new();
        let mut signals = JoinSet::new();
        Self::setup_ctrl_c_handler(shutdown_tx.clone(), &mut signals);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                self.routes.clone(),
                                self.config.clone(),
                                &mut tasks,
                            ).await;
                        },
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }

                // Reap finished connection tasks so the set doesn't grow unbounded
                Some(res) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = res {
                        error!("Connection task failed: {e}");
                    }
                }
            }
        }

        signals.abort_all();
        Self::perform_shutdown(&mut tasks, self.config.shutdown_timeout).await;

        Ok(())
    }

    /// Read a full request from the socket.
    ///
    /// Reads until the headers and the declared body have arrived, the peer
    /// closes its side, or `read_buffer_size` bytes have been read.
    pub async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        read_buffer_size: usize,
    ) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(read_buffer_size.min(8192));
        let mut chunk = vec![0; read_buffer_size.clamp(1, 8192)];

        loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if buf.len() >= read_buffer_size {
                buf.truncate(read_buffer_size);
                break;
            }
            if matches!(request_len(&buf), Some(len) if buf.len() >= len) {
                break;
            }
        }

        Ok(buf)
    }

    /// Serve the single request on `socket`.
    ///
    /// A client that has not sent a complete request within
    /// `config.read_timeout` is answered with a 408.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        routes: Arc<RwLock<Vec<Route>>>,
        config: &ServerConfig,
    ) -> Result<(), Error> {
        let read = tokio::time::timeout(
            config.read_timeout,
            Self::read_request(socket, config.read_buffer_size),
        )
        .await;
        let buf = match read {
            Ok(buf) => buf?,
            Err(_) => {
                let response = HttpResponse::new(StatusCode::RequestTimeout)
                    .with_content_type("text/plain")
                    .with_body_string("Timed out waiting for the request");
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::RequestTimeout(config.read_timeout));
            }
        };
        if buf.is_empty() {
            return Ok(()); // Connection closed
        }

        let mut request = match parse_request(&buf) {
            Ok(req) => req,
            Err(e) => {
                let response = HttpResponse::new(StatusCode::BadRequest)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Error parsing request: {e}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::ParseError(e));
            }
        };

        debug!("{method} {path}", method = request.method, path = request.path);

        // Clone the handler out so the route table lock isn't held while it runs
        let (handler, allowed_methods) = {
            let routes_guard = routes.read().await;
            let path = request.route_path().to_string();

            let matching: Vec<(&Route, _)> = routes_guard
                .iter()
                .filter_map(|route| route.match_path(&path).map(|params| (route, params)))
                .collect();

            if matching.is_empty() {
                let response = HttpResponse::new(StatusCode::NotFound)
                    .with_content_type("text/plain")
                    .with_body_string(format!("Not found: {path}"));
                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::NotFound(path));
            }

            let found = matching
                .iter()
                .find(|(route, _)| route.methods.contains(&request.method));

            match found {
                Some((route, params)) => {
                    request.path_params = params.clone();
                    (Some(route.handler.clone()), Vec::new())
                }
                None => {
                    let mut allowed: Vec<String> = matching
                        .iter()
                        .flat_map(|(route, _)| route.methods.iter().map(|m| m.to_string()))
                        .collect();
                    allowed.dedup();
                    (None, allowed)
                }
            }
        };

        match handler {
            Some(handler) => {
                let response = match handler(request).await {
                    Ok(resp) => resp,
                    Err(e) => {
                        let response = HttpResponse::new(StatusCode::InternalServerError)
                            .with_content_type("text/plain")
                            .with_body_string(format!("Internal server error: {e}"));
                        socket.write_all(&response.to_bytes()).await?;
                        return Err(e);
                    }
                };

                socket.write_all(&response.to_bytes()).await?;
            }
            None => {
                let allowed = allowed_methods.join(", ");
                let response = HttpResponse::new(StatusCode::MethodNotAllowed)
                    .with_header("Allow", allowed.clone())
                    .with_content_type("text/plain")
                    .with_body_string(format!(
                        "Method {method} not allowed for path: {path}. Allowed methods: {allowed}",
                        method = request.method,
                        path = request.path,
                    ));

                socket.write_all(&response.to_bytes()).await?;
                return Err(Error::MethodNotAllowed(request.method, request.path));
            }
        }

        socket.flush().await?;
        Ok(())
    }
}
