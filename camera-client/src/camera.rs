//! Commands of the camera API, one method per endpoint.

use crate::config::Config;
use crate::error::{Error, Error::*, Result};
use crate::files::{FileList, FileRequest, Source};
use crate::settings::{FlashLight, ListWindow, MonoImage};
use crate::transport::{ApiResponse, RequestBody, api_call, build_client, endpoint_url};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Decoded JSON object as returned by the status, info and flashlight commands.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// ISO 8601 without time zone, fractions in microseconds and left out for whole seconds.
fn iso_8601(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() / 1000 == 0 {
        timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Every command without a response from the camera is logged as `command timeout`.
fn failure_message(error: &Error) -> String {
    match error {
        Timeout(_) => error.to_string(),
        e if e.is_transport() => format!("command timeout: {}", e),
        e => e.to_string(),
    }
}

#[derive(Serialize)]
struct ListRequest<'a> {
    source: &'a Source,
    #[serde(flatten)]
    window: ListWindow,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeRequest<'a> {
    start_date_time: String,
    end_date_time: String,
    source: &'a Source,
}

/// A camera reachable over the network.
#[derive(Debug, Clone)]
pub struct Camera {
    config: Config,
    client: Client,
}

impl Camera {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            client: build_client()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Copy of this camera which uses a different default timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            config: self.config.clone().with_timeout(timeout),
            client: self.client.clone(),
        }
    }

    /// Send one command and accept only `200 OK`, logging every failure.
    fn command(
        &self,
        segments: &[&str],
        body: RequestBody,
        timeout: Duration,
    ) -> Result<ApiResponse> {
        let url = endpoint_url(&self.config, segments)?;
        let result = api_call(&self.client, url, body, timeout).and_then(ApiResponse::require_ok);
        if let Err(e) = &result {
            warn!("{}", failure_message(e));
        }
        result
    }

    fn settings<T: Serialize>(settings: &T) -> Result<RequestBody> {
        Ok(RequestBody::Settings(serde_json::to_value(settings)?))
    }

    /// Name, firmware version and timestamp of the camera.
    pub fn get_status(&self) -> Result<JsonObject> {
        self.command(&["status"], RequestBody::Empty, self.config.timeout)?
            .json()
    }

    /// SD card and health information.
    pub fn get_info(&self) -> Result<JsonObject> {
        self.command(&["info"], RequestBody::Empty, self.config.timeout)?
            .json()
    }

    pub fn trigger_camera_restart(&self) -> Result<()> {
        self.command(&["reset"], RequestBody::Empty, self.config.timeout)?;
        info!("Reset in progress...");
        Ok(())
    }

    /// Flash the LEDs of one spectrum. Returns the settings applied by the camera.
    pub fn flash_light(&self, settings: &FlashLight) -> Result<JsonObject> {
        let applied: JsonObject = self
            .command(
                &["flashlight"],
                Self::settings(settings)?,
                self.config.timeout,
            )?
            .json()?;
        debug!("flashlight settings: {:?}", applied);
        Ok(applied)
    }

    /// Content of a single file.
    pub fn get_file(&self, filename: &str, source: &Source) -> Result<Vec<u8>> {
        let request = FileRequest { filename, source };
        Ok(self
            .command(
                &["files", "get"],
                Self::settings(&request)?,
                self.config.timeout,
            )?
            .into_content())
    }

    /// Deleting a file which is already gone fails with [`crate::Error::Protocol`].
    pub fn delete_file(&self, filename: &str, source: &Source) -> Result<()> {
        let request = FileRequest { filename, source };
        self.command(
            &["files", "delete"],
            Self::settings(&request)?,
            self.config.timeout,
        )?;
        info!("Deleted {}", filename);
        Ok(())
    }

    pub fn get_file_list(&self, source: &Source, window: ListWindow) -> Result<FileList> {
        let request = ListRequest { source, window };
        self.command(
            &["files", "list"],
            Self::settings(&request)?,
            self.config.timeout,
        )?
        .json()
    }

    /// Files of `source` created between `start` and `end`.
    pub fn get_files_in_range(
        &self,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
        source: &Source,
    ) -> Result<FileList> {
        let request = RangeRequest {
            start_date_time: iso_8601(start),
            end_date_time: iso_8601(end),
            source,
        };
        self.command(
            &["files", "firstinrange"],
            Self::settings(&request)?,
            self.config.timeout,
        )?
        .json()
    }

    /// Take a multispectral image with the settings stored on the camera.
    ///
    /// The camera only answers once all spectra are captured, so this uses [`Config::capture_timeout`].
    pub fn take_ms_image(&self) -> Result<FileList> {
        self.command(
            &["files", "takeimage"],
            RequestBody::Empty,
            self.config.capture_timeout,
        )?
        .json()
    }

    /// Take a monochrome image and store it to `filename`, replacing any existing file.
    ///
    /// The extension of `filename` selects the image format delivered by the camera.
    pub fn take_mono_image(&self, settings: &MonoImage, filename: impl AsRef<Path>) -> Result<()> {
        let filename = filename.as_ref();
        let endpoint = mono_image_endpoint(filename);
        info!(
            "taking monochrome image to {} with {:?}",
            filename.display(),
            settings
        );

        let image = self
            .command(
                &["camera", endpoint.as_str()],
                Self::settings(settings)?,
                self.config.timeout,
            )?
            .into_content();

        info!("Store image to file");
        fs::write(filename, image).map_err(|e| {
            warn!("Write to file failed: {}", e);
            LocalIo(filename.to_path_buf(), e)
        })
    }

    /// Upload a local file (e.g. a config file) under its own file name.
    pub fn upload_file(&self, file_path: impl AsRef<Path>) -> Result<()> {
        let file_path = file_path.as_ref();
        let filename = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                LocalIo(
                    file_path.to_path_buf(),
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?;
        let data = fs::read(file_path).map_err(|e| LocalIo(file_path.to_path_buf(), e))?;

        // the camera resolves the file name with a wildcard route
        self.command(
            &["files", "put", filename.as_str()],
            RequestBody::Raw(data),
            self.config.timeout,
        )?;
        info!("Command succeeded, file {} uploaded", filename);
        Ok(())
    }
}

/// `image.<ext>` for the extension of the local file, `image` if it has none.
fn mono_image_endpoint(filename: &Path) -> String {
    match filename.extension() {
        Some(extension) => format!("image.{}", extension.to_string_lossy()),
        None => "image".to_string(),
    }
}
