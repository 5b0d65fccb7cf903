//! TCP gateway translating HTTP-style requests into engine commands.

use crate::engine::EngineHandle;
use crate::http::{self, GatewayError, Method, Request, Response};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Upper bound on a request header block.
pub const MAX_REQUEST_BYTES: usize = 8192;

const BANNER: &str = "Bones game server";

pub struct Server {
    listener: TcpListener,
    engine: EngineHandle,
    static_root: Arc<PathBuf>,
}

impl Server {
    pub async fn bind(
        addr: &str,
        engine: EngineHandle,
        static_root: impl Into<PathBuf>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            engine,
            static_root: Arc::new(static_root.into()),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            debug!("Connection from {}", addr);

            let engine = self.engine.clone();
            let static_root = Arc::clone(&self.static_root);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, engine, static_root).await {
                    error!("Error with client {}: {}", addr, e);
                }
            });
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    engine: EngineHandle,
    static_root: Arc<PathBuf>,
) -> std::io::Result<()> {
    let response = match read_request(&mut stream).await? {
        Ok(raw) => {
            debug!("Data from client {}: {}", addr, raw.trim());
            match http::parse_request(&raw) {
                Ok(request) => route(request, &engine, &static_root).await,
                Err(e) => {
                    warn!("Bad request from {}: {}", addr, e);
                    Response::bad_request()
                }
            }
        }
        Err(GatewayError::EmptyRequest) => return Ok(()),
        Err(e) => {
            warn!("Rejecting request from {}: {}", addr, e);
            Response::bad_request()
        }
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Reads until the blank line ending the header block, or EOF.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Result<String, GatewayError>> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buffer.len() > MAX_REQUEST_BYTES {
            return Ok(Err(GatewayError::TooLarge(MAX_REQUEST_BYTES)));
        }
    }

    if buffer.is_empty() {
        return Ok(Err(GatewayError::EmptyRequest));
    }
    Ok(Ok(String::from_utf8_lossy(&buffer).into_owned()))
}

async fn route(request: Request, engine: &EngineHandle, static_root: &Path) -> Response {
    match request.method {
        Method::Get => {
            if let Some((name, args)) = http::command_from_path(&request.path) {
                return match engine.execute(name, args).await {
                    Ok(result) => Response::json(result.to_json()),
                    Err(e) => {
                        error!("{}", e);
                        Response::unavailable()
                    }
                };
            }
            if request.path == "/" {
                return Response::text(BANNER);
            }
            serve_static(static_root, &request.path).await
        }
        Method::Post => Response::new(200, "OK", "empty"),
        Method::Other(method) => {
            warn!("Unsupported method {}", method);
            Response::bad_request()
        }
    }
}

async fn serve_static(root: &Path, request_path: &str) -> Response {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let confined = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !confined || relative.as_os_str().is_empty() {
        return Response::not_found();
    }

    let full = root.join(relative);
    match tokio::fs::read(&full).await {
        Ok(body) => Response::new(200, "OK", body)
            .with_header("Content-Type", http::content_type_for(&full)),
        Err(_) => Response::not_found(),
    }
}
