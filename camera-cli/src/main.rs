mod commands;

use camera_client::{Camera, Config, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_TIMEOUT, Source};
use chrono::{NaiveDateTime, TimeDelta};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Control a RAYN multispectral camera over its HTTP API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log every request.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// IP address (optionally with port) of the camera.
    #[arg(long, env = "CAMERA_IP")]
    ip: String,

    /// API key of the camera.
    #[arg(long, env = "CAMERA_API_KEY", hide_env_values = true)]
    key: String,

    /// Timeout for a single command, in seconds.
    #[arg(long, env = "CAMERA_API_TIMEOUT", global = true, default_value_t = DEFAULT_TIMEOUT.as_secs_f64())]
    timeout: f64,

    /// Timeout for taking a multispectral image, in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_CAPTURE_TIMEOUT.as_secs_f64())]
    capture_timeout: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show name, firmware version and time of the camera.
    Status,
    /// Show SD card and health information.
    Info,
    /// Restart the camera.
    Restart,
    /// Flash the LEDs of a single spectrum.
    Flash {
        /// Spectrum 0-10, 0 is dark.
        #[arg(long, default_value_t = 1)]
        spectrum: u8,
        /// LED brightness 0-1000.
        #[arg(long, default_value_t = 200)]
        brightness: u16,
        /// Duration of the flash in milliseconds.
        #[arg(long, default_value_t = 1000)]
        time: u32,
    },
    /// List the files of a folder on the camera.
    List {
        source: Source,
        /// Index of the first file, 0 and 1 both start with the first file.
        #[arg(long, default_value_t = 0)]
        index: u32,
        /// Maximum number of files.
        #[arg(long, default_value_t = 500)]
        limit: u32,
    },
    /// List the files of a folder created in a time range.
    Range {
        source: Source,
        #[command(flatten)]
        range: TimeRangeArgs,
    },
    /// Download a single file.
    Get {
        source: Source,
        filename: String,
        /// Folder to store the file in.
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Delete a single file from the camera.
    Delete { source: Source, filename: String },
    /// Upload a local file (e.g. a config file) to the camera.
    Upload { path: PathBuf },
    /// Take a monochrome image and store it locally.
    MonoImage {
        /// Spectrum 0-10, 0 is dark.
        #[arg(long, default_value_t = 0)]
        spectrum: u8,
        /// LED brightness 0-1000, 0 turns the LEDs off.
        #[arg(long, default_value_t = 0)]
        brightness: u16,
        /// Exposure time in seconds (0.0-0.25).
        #[arg(long, default_value_t = 0.0)]
        exposure: f64,
        /// Local file, its extension selects the image format.
        #[arg(long, default_value = "image.jpg")]
        filename: PathBuf,
    },
    /// Take a multispectral image with the settings stored on the camera and download it.
    MsImage {
        /// Folder to store the files in, defaults to the name of the source.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Keep the files on the camera after downloading them.
        #[arg(long)]
        keep: bool,
    },
    /// Download all log files and delete them from the camera.
    DownloadLogs {
        #[arg(long, default_value = "service")]
        source: Source,
        /// Folder to store the files in, defaults to the name of the source.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        keep: bool,
    },
    /// Download all files of a time range and delete them from the camera.
    DownloadRange {
        #[arg(long, default_value = "scheduler")]
        source: Source,
        #[command(flatten)]
        range: TimeRangeArgs,
        /// Folder to store the files in, defaults to the name of the source.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        keep: bool,
    },
}

#[derive(Args, Debug)]
struct TimeRangeArgs {
    /// Start of the range (ISO 8601, local time). Defaults to `--days` before the end.
    #[arg(long)]
    start: Option<NaiveDateTime>,
    /// End of the range (ISO 8601, local time). Defaults to now.
    #[arg(long)]
    end: Option<NaiveDateTime>,
    /// Length of the range in days if no start is given.
    #[arg(long, default_value_t = 2)]
    days: u32,
}

impl TimeRangeArgs {
    fn resolve(&self) -> Result<(NaiveDateTime, NaiveDateTime), clap::Error> {
        let end = self.end.unwrap_or_else(|| chrono::Local::now().naive_local());
        let start = match self.start {
            Some(start) => start,
            None => TimeDelta::try_days(i64::from(self.days))
                .and_then(|days| end.checked_sub_signed(days))
                .ok_or_else(|| {
                    Cli::command().error(
                        ErrorKind::ValueValidation,
                        format!("--days {} reaches before the earliest date", self.days),
                    )
                })?,
        };
        Ok((start, end))
    }
}

impl ConnectionArgs {
    fn config(&self) -> Config {
        Config::new(self.ip.as_str(), self.key.as_str())
            .with_timeout(Duration::from_secs_f64(self.timeout))
            .with_capture_timeout(Duration::from_secs_f64(self.capture_timeout))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let camera = match Camera::new(cli.connection.config()) {
        Ok(camera) => camera,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&camera, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(commands::Error::Usage(e)) => e.exit(),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
