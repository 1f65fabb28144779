use camsense_driver::{run_capture, CaptureConfig, ChecksumMode, ScanPoller, Snapshot};
use clap::Parser;
use serde::Serialize;

/// Reads data from a Camsense X1 LiDAR.
#[derive(Parser, Debug)]
#[command(about = "LiDAR data receiver.", disable_version_flag = true)]
struct Args {
    /// The device path to a serial port
    port: String,
    /// Number of sample slots kept in the rotation buffer
    #[arg(long, default_value_t = camsense_data::DEFAULT_BUFFER_CAPACITY)]
    capacity: usize,
    /// Keep the angle sign of a non-mirrored installation
    #[arg(long)]
    no_mirror: bool,
    /// Drop packets whose checksum does not match
    #[arg(long)]
    strict_checksum: bool,
    /// Print every snapshot as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    sequence_id: u64,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    max_distance: u16,
    max_intensity: u8,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let checksum_mode = if args.strict_checksum {
        ChecksumMode::Strict
    } else {
        ChecksumMode::Ignore
    };
    let config = CaptureConfig::new(args.port.clone())
        .with_buffer_capacity(args.capacity)
        .with_mirrored(!args.no_mirror)
        .with_checksum_mode(checksum_mode);

    let capture = match run_capture(config) {
        Ok(capture) => capture,
        Err(e) => {
            log::error!("Failed to start capture on \"{}\". Error: {}", args.port, e);
            std::process::exit(1);
        }
    };

    let mut poller = ScanPoller::system();
    // re-check the producer after every second without a rotation
    while capture.is_running() {
        let report = match poller.next_within(&capture, 100) {
            Some(report) => report,
            None => continue,
        };
        log::info!(
            "Sequence ID: {}, Elapsed time: {:?}, Max elapsed time: {:?}, RPM: {:.1}",
            report.sequence_id,
            report.elapsed,
            report.max_elapsed,
            capture.current_rpm()
        );
        if args.json {
            let message = Message {
                sequence_id: report.sequence_id,
                snapshot: &report.snapshot,
                max_distance: report.max_distance,
                max_intensity: report.max_intensity,
            };
            match serde_json::to_string(&message) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("{e}"),
            }
        }
    }

    drop(capture);
}
