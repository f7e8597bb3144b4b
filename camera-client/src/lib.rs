//! Client for the HTTP API (`/api/v1`) of RAYN multispectral cameras.
//!
//! Every command is a single blocking round trip. Failures are returned as [`Error`]
//! and additionally logged through the `log` facade.
//!
//! ```no_run
//! use camera_client::{Camera, Config, ListWindow, Source};
//!
//! # fn main() -> camera_client::Result<()> {
//! let camera = Camera::new(Config::new("192.168.4.1", "my-api-key"))?;
//! let logs = camera.get_file_list(&Source::Service, ListWindow::default())?;
//! camera.download_files(&logs.files, &logs.source_folder(), None)?;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod config;
pub mod download;
pub mod error;
pub mod files;
pub mod settings;
pub mod transport;

pub use camera::{Camera, JsonObject};
pub use config::{Config, DEFAULT_CAPTURE_TIMEOUT, DEFAULT_TIMEOUT};
pub use download::{DownloadReport, StoredFile, local_path};
pub use error::{Error, Result};
pub use files::{FileList, Source};
pub use settings::{FlashLight, ListWindow, MonoImage};
