//! remoteid-rs: an ASD-STAN / ASTM F3411 Drone Remote ID decoder
//!
//! Decodes Direct Remote ID broadcast payloads (Bluetooth/Wi-Fi
//! advertisement data) into typed records: identity, location/vector,
//! self description, system/operator data, operator ID and
//! authentication pages.

mod codec;
mod config;
mod message;
mod network;
mod parser;
mod uav;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::parser::ParseOutcome;
use crate::uav::UavStore;

const BROADCAST_CAPACITY: usize = 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_args();

    // Initialize logging only if not in interactive mode
    if !config.interactive {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
        info!("remoteid-rs starting...");
        info!("Configuration: {:?}", config);
    }

    let store = Arc::new(RwLock::new(UavStore::new(config.interactive_ttl)));

    // Channel for raw frames from the ingest paths
    let (frame_tx, frame_rx): (Sender<Vec<u8>>, Receiver<Vec<u8>>) = bounded(1024);
    // Broadcast channel for decoded messages as JSON lines
    let (json_tx, _) = broadcast::channel::<String>(BROADCAST_CAPACITY);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let net_handle = if config.net {
            let store = Arc::clone(&store);
            let cfg = config.clone();
            let tx = frame_tx.clone();
            let jtx = json_tx.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = network::run_servers(cfg, store, tx, jtx).await {
                    error!("Network error: {}", e);
                }
            }))
        } else {
            None
        };

        // Frame processing task
        let processor_handle = {
            let store = Arc::clone(&store);
            let cfg = config.clone();
            let jtx = json_tx.clone();
            tokio::spawn(async move {
                process_frames(frame_rx, store, cfg, jtx).await;
            })
        };

        let interactive_handle = if config.interactive {
            let store = Arc::clone(&store);
            let rows = config.interactive_rows;
            Some(tokio::spawn(async move {
                interactive_display(store, rows).await;
            }))
        } else {
            None
        };

        // Stale UAV removal task
        let cleanup_handle = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                loop {
                    interval.tick().await;
                    let mut store = store.write();
                    store.remove_stale();
                }
            })
        };

        if !config.net_only {
            if let Some(ref filename) = config.filename {
                if !config.interactive {
                    info!("Reading frames from: {}", filename);
                }
                if let Err(e) = ingest_file(filename, &frame_tx) {
                    if !config.interactive {
                        error!("Error reading {}: {}", filename, e);
                    }
                }
            } else if !config.net {
                eprintln!("No input. Use --ifile <file> ('-' for stdin) or --net-only.");
            }
        }

        // After file processing, keep running if interactive or net mode
        if config.interactive {
            println!("\nInput complete. Press Ctrl+C to exit...");
            tokio::signal::ctrl_c().await.ok();
        } else if config.net {
            info!("Waiting for frames from network clients");
            tokio::signal::ctrl_c().await.ok();
        }

        cleanup_handle.abort();
        if let Some(h) = net_handle {
            h.abort();
        }
        if let Some(h) = interactive_handle {
            h.abort();
        }
        processor_handle.abort();
    });

    Ok(())
}

/// Read hex frames from a file or stdin, one per line.
fn ingest_file(filename: &str, frame_tx: &Sender<Vec<u8>>) -> io::Result<()> {
    let reader: Box<dyn BufRead> = if filename == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(io::BufReader::new(std::fs::File::open(filename)?))
    };

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match parser::decode_hex_frame(&line) {
            Ok(frame) => {
                if frame_tx.send(frame).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Skipping bad frame line: {}", e),
        }
    }
    Ok(())
}

async fn process_frames(
    rx: Receiver<Vec<u8>>,
    store: Arc<RwLock<UavStore>>,
    config: Config,
    json_tx: broadcast::Sender<String>,
) {
    // Blocking recv on a runtime worker: frames arrive at line rate and
    // the channel is bounded, so the park is short-lived.
    while let Ok(frame) = rx.recv() {
        let (messages, outcome) = parser::parse(&frame);

        match outcome {
            ParseOutcome::Ok => {}
            ParseOutcome::TrailingBytes(n) => {
                debug!("Frame had {} trailing bytes", n);
            }
            ParseOutcome::EmptyInput => continue,
            ParseOutcome::UnsupportedMessageSize(size) => {
                warn!("Dropping frame with unsupported message size {}", size);
                continue;
            }
        }

        {
            let mut store = store.write();
            store.update_from_frame(&messages);
        }

        for msg in &messages {
            if let Ok(json) = serde_json::to_string(msg) {
                let _ = json_tx.send(json.clone());
                if !config.interactive && config.json {
                    println!("{}", json);
                }
            }
            if !config.interactive && !config.json {
                print!("{}", msg);
            }
        }
    }
}

async fn interactive_display(store: Arc<RwLock<UavStore>>, max_rows: usize) {
    let refresh_interval = Duration::from_millis(250);

    loop {
        tokio::time::sleep(refresh_interval).await;

        // Clear screen and move cursor to top
        print!("\x1B[2J\x1B[H");
        let _ = io::stdout().flush();

        const RED: &str = "\x1B[91m";
        const BOLD: &str = "\x1B[1m";
        const RESET: &str = "\x1B[0m";

        println!(
            "{BOLD}{:<22} {:<10} {:<10} {:>10} {:>11} {:>6} {:>6} {:>4} {:<16} {:>5} {:>3}{RESET}",
            "UAS ID", "Type", "Status", "Lat", "Lon", "Hgt", "Spd", "Dir", "Operator", "Msgs", "Age"
        );
        println!("{}", "-".repeat(112));

        let store = store.read();
        let now = Instant::now();

        let mut uavs: Vec<_> = store.all().collect();
        // Sort by most recently seen
        uavs.sort_by(|a, b| b.seen.cmp(&a.seen));

        for uav in uavs.iter().take(max_rows) {
            let seen_secs = now.duration_since(uav.seen).as_secs();

            let (lat_str, lon_str) = if uav.latitude != 0.0 || uav.longitude != 0.0 {
                (
                    format!("{:.5}", uav.latitude),
                    format!("{:.5}", uav.longitude),
                )
            } else {
                (String::new(), String::new())
            };

            let hgt_str = if uav.height != -1000.0 {
                format!("{:.0}", uav.height)
            } else {
                String::new()
            };

            let spd_str = if uav.horizontal_speed < 255.0 {
                format!("{:.1}", uav.horizontal_speed)
            } else {
                String::new()
            };

            let dir_str = if uav.direction < 360.0 {
                format!("{:.0}", uav.direction)
            } else {
                String::new()
            };

            let is_emergency = matches!(uav.status, crate::message::UavStatus::Emergency);
            let id_display = if is_emergency {
                format!("{}{}{}", RED, uav.uas_id, RESET)
            } else {
                uav.uas_id.clone()
            };

            println!(
                "{:<22} {:<10} {:<10} {:>10} {:>11} {:>6} {:>6} {:>4} {:<16} {:>5} {:>2}s",
                id_display,
                format!("{:?}", uav.uav_type),
                format!("{:?}", uav.status),
                lat_str,
                lon_str,
                hgt_str,
                spd_str,
                dir_str,
                uav.operator_id,
                uav.messages,
                seen_secs
            );

            if is_emergency {
                println!("{RED}  ⚠ EMERGENCY declared by UAS{RESET}");
            }
        }

        println!("{}", "-".repeat(112));
        println!(
            "UAVs: {} | Unattributed frames: {} | Ctrl+C to exit",
            store.len(),
            store.unattributed_frames()
        );

        io::stdout().flush().ok();
    }
}
