//! Network services for remoteid-rs
//!
//!  Hex frame input over TCP, decoded-message JSON broadcast, and a
//!  minimal HTTP endpoint exposing the UAV table.

use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::parser;
use crate::uav::UavStore;

pub async fn run_servers(
    config: Config,
    store: Arc<RwLock<UavStore>>,
    frame_tx: Sender<Vec<u8>>,
    json_tx: broadcast::Sender<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let frame_in_handle = {
        let port = config.net_ri_port;
        let tx = frame_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = run_frame_input_server(port, tx).await {
                error!("Frame input server error: {}", e);
            }
        })
    };

    let json_out_handle = {
        let port = config.net_ro_port;
        let tx = json_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = run_json_output_server(port, tx).await {
                error!("JSON output server error: {}", e);
            }
        })
    };

    let http_handle = {
        let port = config.net_http_port;
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(port, store).await {
                error!("HTTP server error: {}", e);
            }
        })
    };

    tokio::select! {
        _ = frame_in_handle => {}
        _ = json_out_handle => {}
        _ = http_handle => {}
    }

    Ok(())
}

/// Accept clients that push hex-encoded frames, one per line, as an
/// advertisement-capture collaborator would.
async fn run_frame_input_server(
    port: u16,
    frame_tx: Sender<Vec<u8>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Frame input server listening on port {}", port);

    loop {
        let (socket, addr) = listener.accept().await?;
        debug!("Frame input client connected: {}", addr);
        let tx = frame_tx.clone();

        tokio::spawn(async move {
            let reader = BufReader::new(socket);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                if line.trim().is_empty() {
                    continue;
                }
                match parser::decode_hex_frame(&line) {
                    Ok(frame) => {
                        // Blocking send; parks this worker only when the
                        // bounded frame channel is full.
                        if tx.send(frame).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("Bad frame from {}: {}", addr, e),
                }
            }
            debug!("Frame input client disconnected: {}", addr);
        });
    }
}

/// Broadcast every decoded message to connected clients as a JSON line.
async fn run_json_output_server(
    port: u16,
    tx: broadcast::Sender<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("JSON output server listening on port {}", port);

    loop {
        let (socket, addr) = listener.accept().await?;
        debug!("JSON output client connected: {}", addr);
        let mut rx = tx.subscribe();

        tokio::spawn(async move {
            let mut socket = socket;
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if socket.write_all(msg.as_bytes()).await.is_err() {
                            break;
                        }
                        if socket.write_all(b"\n").await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
            debug!("JSON output client disconnected: {}", addr);
        });
    }
}

async fn run_http_server(
    port: u16,
    store: Arc<RwLock<UavStore>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("HTTP server listening on port {}", port);

    loop {
        let (socket, addr) = listener.accept().await?;
        debug!("HTTP client connected: {}", addr);

        let store = Arc::clone(&store);

        tokio::spawn(async move {
            if let Err(e) = handle_http_request(socket, store).await {
                debug!("HTTP error: {}", e);
            }
        });
    }
}

async fn handle_http_request(
    mut socket: TcpStream,
    store: Arc<RwLock<UavStore>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut buffer = vec![0u8; 8192];
    let n = socket.read(&mut buffer).await?;

    if n == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..n]);
    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();

    if parts.len() < 2 {
        return Ok(());
    }

    let (status, content_type, content) = if parts[1].contains("/data.json") {
        let snapshot = {
            let store = store.read();
            store.snapshot()
        };
        let json = serde_json::to_string(&snapshot)?;
        ("200 OK", "application/json;charset=utf-8", json)
    } else {
        (
            "404 Not Found",
            "text/plain;charset=utf-8",
            "Not found. Try /data.json\n".to_string(),
        )
    };

    let header = format!(
        "HTTP/1.1 {}\r\n\
         Server: remoteid-rs\r\n\
         Content-Type: {}\r\n\
         Connection: close\r\n\
         Content-Length: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\
         \r\n",
        status,
        content_type,
        content.len()
    );

    socket.write_all(header.as_bytes()).await?;
    socket.write_all(content.as_bytes()).await?;

    Ok(())
}
