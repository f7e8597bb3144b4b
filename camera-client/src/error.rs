use Error::*;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// The configured device address does not form a valid API URL.
    InvalidAddress(url::ParseError),
    Timeout(reqwest::Error),
    Connection(reqwest::Error),
    Request(reqwest::Error),
    /// The device answered, but not with `200 OK`.
    Protocol { status: u16, content: Vec<u8> },
    Decode(serde_json::Error),
    LocalIo(PathBuf, std::io::Error),
}

impl Error {
    /// Whether the request never produced a response from the device.
    pub fn is_transport(&self) -> bool {
        matches!(self, Timeout(_) | Connection(_) | Request(_))
    }

    /// The HTTP status the device answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidAddress(e) => write!(f, "invalid camera address: {}", e),
            Timeout(_) => write!(f, "command timeout"),
            Connection(e) => write!(f, "failed to connect to the camera: {}", e),
            Request(e) => write!(f, "request failed: {}", e),
            Protocol { status, content } => write!(
                f,
                "command failed, response code {}, info: {}",
                status,
                String::from_utf8_lossy(content)
            ),
            Decode(_) => write!(f, "failed to decode the response of the camera"),
            LocalIo(path, _) => write!(f, "file access failed for {}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvalidAddress(e) => Some(e),
            Timeout(e) | Connection(e) | Request(e) => Some(e),
            Decode(e) => Some(e),
            LocalIo(_, e) => Some(e),
            Protocol { .. } => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        InvalidAddress(e)
    }
}

/// Sorts transport failures by what went wrong on the wire.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Timeout(e)
        } else if e.is_connect() {
            Connection(e)
        } else {
            Request(e)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Decode(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
