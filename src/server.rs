use std::{collections::HashMap, io, net::SocketAddr};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

use crate::{conn::Session, error::HandshakeError, handshake};

/// Cap on the request line plus header section.
const MAX_HEADER_BYTES: u64 = 1024 * 1024;

/// Listen address and endpoint path, passed explicitly to
/// [`WebSocketServer::bind`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1".to_string(),
            port: 8080,
            path: "/ws".to_string(),
        }
    }
}

/// Accept loop: one spawned task per connection, no state shared
/// between connections.
pub struct WebSocketServer {
    listener: TcpListener,
    path: String,
}

impl WebSocketServer {
    pub async fn bind(config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind((config.addr.as_str(), config.port)).await?;
        tracing::info!(addr = %listener.local_addr()?, path = %config.path, "listening");
        Ok(Self {
            listener,
            path: config.path,
        })
    }

    pub fn addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let path = self.path.clone();
            tokio::spawn(async move {
                if let Err(e) = serve(stream, peer, &path).await {
                    tracing::warn!(addr = %peer, error = ?e, "connection error");
                }
            });
        }
    }
}

struct RequestHead {
    path: String,
    headers: handshake::Headers,
}

/// Reads the request line and headers. Header names are lowercased so
/// lookups are case-insensitive; values stay verbatim.
///
/// Returns `None` when the head exceeds [`MAX_HEADER_BYTES`] before its
/// terminating blank line.
async fn read_request_head(stream: &mut BufReader<TcpStream>) -> io::Result<Option<RequestHead>> {
    let mut limited = stream.take(MAX_HEADER_BYTES);

    let mut request_line = String::new();
    limited.read_line(&mut request_line).await?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if limited.read_line(&mut line).await? == 0 {
            if limited.limit() == 0 {
                return Ok(None);
            }
            // peer closed before the blank line
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    Ok(Some(RequestHead { path, headers }))
}

async fn serve(stream: TcpStream, peer: SocketAddr, path: &str) -> io::Result<()> {
    // the buffered reader survives the handoff to the session, so no
    // client bytes are lost between handshake and frame loop
    let mut stream = BufReader::new(stream);
    let Some(head) = read_request_head(&mut stream).await? else {
        tracing::info!(addr = %peer, "request head too large, refusing");
        return write_error(&mut stream, 400, "Bad Request", "Request header too large").await;
    };

    if head.path != path {
        return write_error(&mut stream, 404, "Not Found", "404 page not found").await;
    }

    let accept_key = match handshake::upgrade(&head.headers) {
        Ok(key) => key,
        Err(e) => {
            tracing::info!(addr = %peer, error = ?e, "upgrade refused");
            return write_error(&mut stream, 400, "Bad Request", e.reason()).await;
        }
    };

    let response = handshake::switching_protocols(&accept_key);
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        let e = HandshakeError::StreamTakeover(e);
        tracing::warn!(addr = %peer, error = ?e, "protocol switch failed");
        return write_error(&mut stream, 500, "Internal Server Error", e.reason()).await;
    }

    tracing::info!(addr = %peer, "connection upgraded");
    Session::new(stream).run().await;
    tracing::info!(addr = %peer, "connection released");
    Ok(())
}

async fn write_error(
    stream: &mut BufReader<TcpStream>,
    status: u16,
    status_text: &str,
    body: &str,
) -> io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status} {status_text}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Length: {}\r\n\r\n\
         {body}\n",
        body.len() + 1,
    );
    stream.write_all(response.as_bytes()).await
}
