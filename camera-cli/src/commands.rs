use crate::Command;
use Error::*;
use camera_client::{
    Camera, DownloadReport, FileList, FlashLight, ListWindow, MonoImage, Source, local_path,
};
use log::{info, warn};
use serde_json::to_string_pretty;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    /// A camera command or the local file handling failed.
    Device(camera_client::Error),
    /// The arguments could only be rejected once the command ran.
    Usage(clap::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Device(e) => write!(f, "{}", e),
            Usage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Device(e) => Some(e),
            Usage(e) => Some(e),
        }
    }
}

impl From<camera_client::Error> for Error {
    fn from(e: camera_client::Error) -> Self {
        Device(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Device(e.into())
    }
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        Usage(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn run(camera: &Camera, command: Command) -> Result<()> {
    match command {
        Command::Status => println!("{}", to_string_pretty(&camera.get_status()?)?),
        Command::Info => println!("{}", to_string_pretty(&camera.get_info()?)?),
        Command::Restart => camera.trigger_camera_restart()?,
        Command::Flash {
            spectrum,
            brightness,
            time,
        } => {
            let applied = camera.flash_light(&FlashLight {
                spectrum,
                brightness,
                time_ms: time,
            })?;
            println!("{}", to_string_pretty(&applied)?);
        }
        Command::List {
            source,
            index,
            limit,
        } => print_file_list(&camera.get_file_list(&source, ListWindow { index, limit })?),
        Command::Range { source, range } => {
            let (start, end) = range.resolve()?;
            print_file_list(&camera.get_files_in_range(&start, &end, &source)?);
        }
        Command::Get {
            source,
            filename,
            output,
        } => {
            let path = local_path(&output, &filename).ok_or_else(|| {
                camera_client::Error::LocalIo(
                    output.join(&filename),
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "file name points outside of the output folder",
                    ),
                )
            })?;
            let content = camera.get_file(&filename, &source)?;
            fs::write(&path, content).map_err(|e| camera_client::Error::LocalIo(path.clone(), e))?;
            info!("Stored file to {}", path.display());
        }
        Command::Delete { source, filename } => camera.delete_file(&filename, &source)?,
        Command::Upload { path } => camera.upload_file(path)?,
        Command::MonoImage {
            spectrum,
            brightness,
            exposure,
            filename,
        } => {
            let settings = MonoImage {
                spectrum,
                brightness,
                exposure,
            };
            camera.take_mono_image(&settings, filename)?;
        }
        Command::MsImage { output, keep } => {
            info!("Taking multispectral image. This might take a while!");
            let image_files = camera.take_ms_image()?;
            info!("Done taking multispectral image");
            download_and_delete(camera, &image_files, output.as_deref(), keep)?;
        }
        Command::DownloadLogs {
            source,
            output,
            keep,
        } => {
            let log_files = camera.get_file_list(&source, ListWindow::default())?;
            info!(
                "Found {} log files. Downloading them to folder {}",
                log_files.total, log_files.source
            );
            download_and_delete(camera, &log_files, output.as_deref(), keep)?;
        }
        Command::DownloadRange {
            source,
            range,
            output,
            keep,
        } => {
            let (start, end) = range.resolve()?;
            let file_list = camera.get_files_in_range(&start, &end, &source)?;
            info!("Found files: {}", file_list.files.join(", "));
            download_and_delete(camera, &file_list, output.as_deref(), keep)?;
        }
    }
    Ok(())
}

fn print_file_list(file_list: &FileList) {
    println!(
        "{} of {} files in {}:",
        file_list.files.len(),
        file_list.total,
        file_list.source
    );
    for file in &file_list.files {
        println!("{}", file);
    }
}

/// Download all files of the list into `output`, or a folder named after their source.
///
/// Unless `keep` is set, the files are deleted from the camera afterwards. Files which could not be
/// stored locally stay on the camera.
fn download_and_delete(
    camera: &Camera,
    file_list: &FileList,
    output: Option<&Path>,
    keep: bool,
) -> Result<DownloadReport> {
    let source: Source = file_list.source_folder();
    let report = camera.download_files(&file_list.files, &source, output)?;
    if !report.is_complete() {
        warn!(
            "{} files could not be downloaded: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }

    if !keep {
        info!("Deleting downloaded files");
        for file in report.stored_names() {
            // failures are logged by the client, the remaining files are still deleted
            let _ = camera.delete_file(file, &source);
        }
    }
    Ok(report)
}
