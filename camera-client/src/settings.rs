//! Settings sent along with the camera commands.
//!
//! The documented ranges (spectrum 0-10, brightness 0-1000) are not enforced here, the camera decides.

use serde::Serialize;

/// Flash the LEDs of a single spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlashLight {
    pub spectrum: u8,
    pub brightness: u16,
    /// Duration of the flash in milliseconds.
    #[serde(rename = "time")]
    pub time_ms: u32,
}

impl Default for FlashLight {
    fn default() -> Self {
        Self {
            spectrum: 1,
            brightness: 200,
            time_ms: 1000,
        }
    }
}

/// Settings for a monochrome image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonoImage {
    pub spectrum: u8,
    pub brightness: u16,
    /// Exposure time in seconds.
    pub exposure: f64,
}

/// Pagination window for file lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListWindow {
    /// Index of the first file in the reply. Both 0 and 1 start with the first file of the folder.
    pub index: u32,
    /// Maximum number of files in the reply.
    pub limit: u32,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            index: 0,
            limit: 500,
        }
    }
}
