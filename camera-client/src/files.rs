use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A storage folder on the camera.
#[derive(Debug, Clone, PartialOrd, PartialEq, Ord, Eq, Hash)]
pub enum Source {
    /// Images taken by the scheduler.
    Scheduler,
    Web,
    /// Log files.
    Service,
    /// Any other folder the firmware knows about.
    Other(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::Scheduler => "scheduler",
            Source::Web => "web",
            Source::Service => "service",
            Source::Other(name) => name,
        }
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        match value {
            "scheduler" => Source::Scheduler,
            "web" => Source::Web,
            "service" => Source::Service,
            other => Source::Other(other.to_string()),
        }
    }
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(name.as_str().into())
    }
}

/// Files of one folder, as returned by the list, range and capture commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileList {
    pub total: u64,
    pub source: String,
    pub files: Vec<String>,
}

impl FileList {
    pub fn source_folder(&self) -> Source {
        self.source.as_str().into()
    }
}

/// Identifies a single file on the camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub(crate) struct FileRequest<'a> {
    pub filename: &'a str,
    pub source: &'a Source,
}
