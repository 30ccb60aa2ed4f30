//! RigCheck command-line harness.
//!
//! Drives a scripted command sequence against an embedded device over a
//! serial link and reports how each message was acknowledged.
//!
//! ```text
//! rigcheck /dev/ttyACM0          # run the built-in script, 1s read timeout
//! rigcheck COM3 5                # 5 second read timeout
//! rigcheck /dev/ttyACM0 --script marking.json
//! rigcheck --list                # enumerate candidate ports
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rigcheck_core::protocol::{list_ports, Session, SessionConfig};
use rigcheck_core::script::Script;
use rigcheck_core::VERSION;

#[derive(Parser)]
#[command(name = "rigcheck")]
#[command(version = VERSION)]
#[command(about = "Serial test harness for line-acknowledged device protocols", long_about = None)]
struct Cli {
    /// Serial device to connect to (e.g. /dev/ttyACM0 or COM3)
    device: Option<String>,

    /// Per-read timeout in seconds
    #[arg(default_value_t = 1)]
    timeout: u64,

    /// JSON script file (an array of message strings) instead of the
    /// built-in script
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// List candidate serial ports and exit
    #[arg(long)]
    list: bool,

    /// Print the final report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.list {
        for port in list_ports() {
            match port.product {
                Some(product) => println!("{}  ({})", port.name, product),
                None => println!("{}", port.name),
            }
        }
        return Ok(());
    }

    let device = cli
        .device
        .context("no serial device given (use --list to see candidates)")?;

    let script = match &cli.script {
        Some(path) => Script::from_file(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Script::default(),
    };

    // Opening the port resets the device; the session clears the boot noise
    println!("connecting to port {}", device);
    let config = SessionConfig::new(&device).with_timeout(Duration::from_secs(cli.timeout));
    let mut session = Session::open(&config).context("failed to open serial port")?;

    println!("waiting for sync");
    let identity = session.synchronize().context("synchronization failed")?;
    println!("Sync");
    println!("{}", identity);

    let report = session
        .run(&script)
        .context("session aborted on transport error")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}: {} acknowledged, {} rejected of {} messages",
            script.name(),
            report.acknowledged(),
            report.device_errors(),
            report.outcomes.len()
        );
    }
    Ok(())
}
