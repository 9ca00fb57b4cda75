//! Configuration and command-line argument parsing

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Input
    /// Hex frame file, one frame per line ("-" for stdin).
    pub filename: Option<String>,

    // Output
    /// Emit one JSON line per decoded message instead of pretty text.
    pub json: bool,
    pub interactive: bool,
    pub interactive_rows: usize,
    /// Seconds before an idle UAV is dropped from the table.
    pub interactive_ttl: u64,

    // Networking
    pub net: bool,
    pub net_only: bool,
    /// TCP port accepting hex frame lines.
    pub net_ri_port: u16,
    /// TCP port broadcasting decoded messages as JSON lines.
    pub net_ro_port: u16,
    pub net_http_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filename: None,
            json: false,
            interactive: false,
            interactive_rows: 15,
            interactive_ttl: 60,
            net: false,
            net_only: false,
            net_ri_port: 30011,
            net_ro_port: 30012,
            net_http_port: 8090,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut config = Config::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--ifile" => {
                    i += 1;
                    config.filename = args.get(i).cloned();
                }
                "--json" => config.json = true,
                "--interactive" => config.interactive = true,
                "--interactive-rows" => {
                    i += 1;
                    config.interactive_rows =
                        args.get(i).and_then(|s| s.parse().ok()).unwrap_or(15);
                }
                "--interactive-ttl" => {
                    i += 1;
                    config.interactive_ttl = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(60);
                }
                "--net" => config.net = true,
                "--net-only" => {
                    config.net = true;
                    config.net_only = true;
                }
                "--net-ri-port" => {
                    i += 1;
                    config.net_ri_port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(30011);
                }
                "--net-ro-port" => {
                    i += 1;
                    config.net_ro_port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(30012);
                }
                "--net-http-port" => {
                    i += 1;
                    config.net_http_port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(8090);
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown option: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"remoteid-rs - ASD-STAN / ASTM F3411 Drone Remote ID decoder

Usage: remoteid-rs [OPTIONS]

Options:
  --ifile <filename>     Read hex frames from file, one per line ('-' for stdin)
  --json                 Print decoded messages as JSON lines
  --interactive          Interactive mode refreshing the UAV table on screen
  --interactive-rows <N> Max rows in interactive mode (default: 15)
  --interactive-ttl <s>  Remove UAV from table if idle for <s> seconds (default: 60)
  --net                  Enable networking
  --net-only             Enable just networking, no input file
  --net-ri-port <port>   TCP port for hex frame input (default: 30011)
  --net-ro-port <port>   TCP port for JSON message output (default: 30012)
  --net-http-port <port> HTTP server port (default: 8090)
  --help                 Show this help
"#
    );
}
