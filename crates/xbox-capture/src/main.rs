//! xbox-capture - read input reports from an Xbox One Controller over raw USB

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hid_xbox_one_protocol::{resolve, UsbChannel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xbox_capture::output::{self, ReportRecord};
use xbox_capture::{
    usb, CaptureError, CaptureFile, HandshakePolicy, RusbChannel, Session, SessionConfig,
};

#[derive(Parser)]
#[command(
    name = "xbox-capture",
    about = "Xbox One Controller (1537) raw USB reader and report capture tool",
    version
)]
struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected USB devices
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the descriptor tree and the resolved interrupt endpoints
    Describe {
        #[command(flatten)]
        device: DeviceArgs,
    },
    /// Send the handshake and read input reports
    Capture(CaptureArgs),
    /// Decode the reports stored in a capture file
    Replay {
        /// Capture file written by `capture --output`
        file: PathBuf,
        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct DeviceArgs {
    /// Vendor ID (hex, e.g. 0x045E)
    #[arg(long, value_parser = parse_hex_u16, default_value = "0x045E", env = "XBOX_CAPTURE_VID")]
    vid: u16,
    /// Product ID (hex, e.g. 0x02D1)
    #[arg(long, value_parser = parse_hex_u16, default_value = "0x02D1", env = "XBOX_CAPTURE_PID")]
    pid: u16,
}

#[derive(Args, Debug, Clone)]
struct CaptureArgs {
    #[command(flatten)]
    device: DeviceArgs,
    /// Read timeout per transfer in milliseconds
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,
    /// Send timeout per handshake frame in milliseconds
    #[arg(long, default_value_t = 500)]
    handshake_timeout_ms: u64,
    /// Pause between handshake frames in milliseconds
    #[arg(long, default_value_t = 20)]
    handshake_delay_ms: u64,
    /// Read buffer size in bytes (16-64)
    #[arg(long, default_value_t = 64)]
    buffer_capacity: usize,
    /// Keep going when a handshake frame fails
    #[arg(long)]
    lenient_handshake: bool,
    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<u64>,
    /// Stop after this many reports
    #[arg(long)]
    max_reports: Option<u64>,
    /// Print JSON lines instead of text
    #[arg(long)]
    json: bool,
    /// Save captured reports to a JSON file (requires --duration or --max-reports)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl CaptureArgs {
    fn session_config(&self) -> SessionConfig {
        let policy = if self.lenient_handshake {
            HandshakePolicy::Lenient
        } else {
            HandshakePolicy::Strict
        };
        SessionConfig::default()
            .with_read_timeout(Duration::from_millis(self.timeout_ms))
            .with_handshake_timeout(Duration::from_millis(self.handshake_timeout_ms))
            .with_handshake_delay(Duration::from_millis(self.handshake_delay_ms))
            .with_buffer_capacity(self.buffer_capacity)
            .with_handshake_policy(policy)
            .with_max_reports(self.max_reports)
            .with_duration(self.duration.map(Duration::from_secs))
    }
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).map_err(|e| format!("invalid hex value '{s}': {e}"))
}

fn list_devices(json: bool) -> Result<()> {
    let devices = usb::list_devices().context("Failed to enumerate USB devices")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }
    if devices.is_empty() {
        println!("No USB devices found.");
        return Ok(());
    }
    println!("{:<5} {:<5} {:<8} {:<8} Name", "Bus", "Addr", "VID", "PID");
    println!("{}", "-".repeat(60));
    for dev in &devices {
        println!(
            "{:<5} {:<5} {:<8} {:<8} {}{}",
            format!("{:03}", dev.bus_number),
            format!("{:03}", dev.address),
            format!("0x{:04X}", dev.vendor_id),
            format!("0x{:04X}", dev.product_id),
            dev.display_name(),
            if dev.is_supported() { "  [supported]" } else { "" },
        );
    }
    Ok(())
}

fn describe(device: DeviceArgs) -> Result<()> {
    let channel = RusbChannel::open(device.vid, device.pid)?;
    let tree = channel
        .descriptor_tree()
        .map_err(CaptureError::from)
        .context("Failed to read the active configuration descriptor")?;
    let pair = resolve(&tree).ok();
    println!("{}", output::format_tree(&tree, pair.as_ref()));
    Ok(())
}

fn capture(args: &CaptureArgs) -> Result<()> {
    let config = args.session_config();
    if args.output.is_some() && !config.is_bounded() {
        return Err(CaptureError::InvalidConfig(
            "--output requires --duration or --max-reports".to_string(),
        )
        .into());
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop_clone = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop_clone.store(true, Ordering::Relaxed);
        })
        .context("failed to install Ctrl-C handler")?;
    }

    let channel = RusbChannel::open(args.device.vid, args.device.pid)?;
    let mut session = Session::open(channel, config)?;
    let endpoints = session.endpoints();
    println!(
        "Interface={} EP_IN=0x{:02x} EP_OUT=0x{:02x}",
        endpoints.interface_number, endpoints.ep_in, endpoints.ep_out
    );

    for outcome in session.handshake()? {
        match &outcome.result {
            Ok(transferred) => println!(
                "Handshake {} ({} bytes) transferred={transferred}",
                outcome.frame, outcome.len
            ),
            Err(e) => println!("Handshake {} ({} bytes) failed: {e}", outcome.frame, outcome.len),
        }
    }

    println!("Reading input... (Ctrl+C to stop)");
    let mut file = CaptureFile::new(args.device.vid, args.device.pid, endpoints);
    let recording = args.output.is_some();
    let result = session.run_until(&stop, |event| {
        if recording {
            file.push(event);
        }
        if args.json {
            println!("{}", serde_json::to_string(&ReportRecord::from(event))?);
        } else if !recording {
            for line in output::format_event(event) {
                println!("{line}");
            }
        }
        Ok(())
    });

    // Release the interface before writing, and keep whatever was captured
    // even if the device went away mid-session.
    drop(session);
    if let Some(path) = &args.output {
        file.save(path)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        println!("Captured {} report(s) to '{}'.", file.captures.len(), path.display());
    }

    let stats = result?;
    println!(
        "Read {} report(s): {} decoded, {} short, {} timeouts.",
        stats.reports, stats.decoded, stats.short, stats.timeouts
    );
    Ok(())
}

fn replay(path: &Path, json: bool) -> Result<()> {
    let file = CaptureFile::load(path)
        .with_context(|| format!("Failed to read capture file '{}'", path.display()))?;
    println!(
        "Capture of VID={} PID={} ({} report(s))",
        file.vendor_id,
        file.product_id,
        file.captures.len()
    );
    for (report, state) in file.captures.iter().zip(file.replay()?) {
        let raw = report.bytes()?;
        if json {
            let record = ReportRecord {
                elapsed_us: report.timestamp_us,
                len: raw.len(),
                raw: report.data.clone(),
                state,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("[+{:>10}us] {}", report.timestamp_us, output::format_raw(&raw));
            if let Some(state) = &state {
                println!("{}", output::format_decoded(state));
            }
        }
    }
    let mismatches = file.mismatches()?;
    if !mismatches.is_empty() {
        tracing::warn!(count = mismatches.len(), "Stored states differ from a fresh decode");
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("xbox_capture={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List { json } => list_devices(*json),
        Commands::Describe { device } => describe(*device),
        Commands::Capture(args) => capture(args),
        Commands::Replay { file, json } => replay(file, *json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
            let code = e
                .downcast_ref::<CaptureError>()
                .map_or(1, CaptureError::exit_code);
            ExitCode::from(code)
        }
    }
}
