use crate::camera::Camera;
use crate::error::{Error::*, Result};
use crate::files::Source;
use log::{info, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// A file written by [`Camera::download_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name of the file on the camera.
    pub name: String,
    /// Local path the file was written to.
    pub path: PathBuf,
}

/// Outcome of [`Camera::download_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// The stored files, in download order.
    pub stored: Vec<StoredFile>,
    /// Names of the files which could not be fetched or written.
    pub skipped: Vec<String>,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Camera names of the stored files, e.g. to delete them from the camera afterwards.
    pub fn stored_names(&self) -> impl Iterator<Item = &str> {
        self.stored.iter().map(|file| file.name.as_str())
    }
}

/// Local path for the camera file `filename` inside `folder`.
///
/// Returns `None` for names which would leave the folder: absolute paths, `..`, `.` or empty names.
pub fn local_path(folder: &Path, filename: &str) -> Option<PathBuf> {
    let name = Path::new(filename);
    let mut components = name.components().peekable();
    components.peek()?;
    if components.all(|component| matches!(component, Component::Normal(_))) {
        Some(folder.join(name))
    } else {
        None
    }
}

impl Camera {
    /// Download the given files of `source` one by one.
    ///
    /// The files are stored in `path`, or in a folder named after the source if no path is given.
    /// A file which can't be fetched or written is skipped, the remaining downloads continue.
    /// Names which would resolve outside the folder are skipped without fetching them.
    /// Only a failure to create the destination folder aborts the download.
    pub fn download_files<I, S>(
        &self,
        files: I,
        source: &Source,
        path: Option<&Path>,
    ) -> Result<DownloadReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folder = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(source.as_str()));
        let mut folder_created = false;
        let mut report = DownloadReport::default();

        for file in files {
            let file = file.as_ref();
            let Some(full_path) = local_path(&folder, file) else {
                warn!("Refusing to store {} outside of {}", file, folder.display());
                report.skipped.push(file.to_string());
                continue;
            };

            info!("Downloading {}", file);
            let content = match self.get_file(file, source) {
                Ok(content) => content,
                Err(e) => {
                    warn!("No file to store for {}: {}", file, e);
                    report.skipped.push(file.to_string());
                    continue;
                }
            };

            if !folder_created {
                fs::create_dir_all(&folder).map_err(|e| LocalIo(folder.clone(), e))?;
                folder_created = true;
            }

            info!("Storing file to {}", full_path.display());
            match fs::write(&full_path, content) {
                Ok(()) => report.stored.push(StoredFile {
                    name: file.to_string(),
                    path: full_path,
                }),
                Err(e) => {
                    warn!("Write to {} failed: {}", full_path.display(), e);
                    report.skipped.push(file.to_string());
                }
            }
        }

        Ok(report)
    }
}
