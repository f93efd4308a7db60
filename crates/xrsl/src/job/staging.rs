//! Files moved in and out of the job's session directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A URL value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL '{text}': {reason}")]
pub struct UrlError {
    pub text: String,
    pub reason: String,
}

/// A secondary replica of a [`DataUrl`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLocation {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl DataLocation {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }
}

/// A source or target URL with transfer options.
///
/// Values containing `://` are checked with [`url::Url`]; anything else is
/// kept as a path relative to the submission directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<DataLocation>,
}

impl DataUrl {
    pub fn parse(text: &str) -> Result<DataUrl, UrlError> {
        if text.contains("://") {
            Url::parse(text).map_err(|error| UrlError {
                text: text.to_string(),
                reason: error.to_string(),
            })?;
        }
        Ok(DataUrl {
            url: text.to_string(),
            ..DataUrl::default()
        })
    }

    /// The URL scheme, or `None` for plain paths.
    pub fn scheme(&self) -> Option<String> {
        if !self.url.contains("://") {
            return None;
        }
        Url::parse(&self.url).ok().map(|url| url.scheme().to_string())
    }

    /// Whether the data lives on the submitting machine.
    pub fn is_local(&self) -> bool {
        self.scheme().is_none_or(|scheme| scheme == "file")
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Set an option, replacing any previous value.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn add_location(&mut self, url: impl Into<String>) {
        self.locations.push(DataLocation {
            url: url.into(),
            options: BTreeMap::new(),
        });
    }
}

/// A file staged into the session directory before execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub name: String,
    #[serde(default)]
    pub is_executable: bool,
    /// Size of a file uploaded from the submitting machine, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub sources: Vec<DataUrl>,
}

/// A file kept or uploaded after execution.
///
/// No targets means the file is kept in the session directory for retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<DataUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStaging {
    #[serde(default)]
    pub input_files: Vec<InputFile>,
    #[serde(default)]
    pub output_files: Vec<OutputFile>,
}

impl DataStaging {
    pub fn input_file(&self, name: &str) -> Option<&InputFile> {
        self.input_files.iter().find(|file| file.name == name)
    }

    pub fn output_file(&self, name: &str) -> Option<&OutputFile> {
        self.output_files.iter().find(|file| file.name == name)
    }
}
