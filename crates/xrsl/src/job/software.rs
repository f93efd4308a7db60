use std::fmt;

use serde::{Deserialize, Serialize};

/// A named, optionally versioned piece of software.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    pub version: String,
    /// Extra arguments passed to the software environment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Software {
    /// Split `name-version` at the first `-` that is followed by a digit.
    ///
    /// ```
    /// use xrsl::job::Software;
    ///
    /// let software = Software::parse("APPS/HEP/ATLAS-21.0.15");
    /// assert_eq!(software.name, "APPS/HEP/ATLAS");
    /// assert_eq!(software.version, "21.0.15");
    /// assert_eq!(Software::parse("python-dev").version, "");
    /// ```
    pub fn parse(text: &str) -> Software {
        let split = text
            .char_indices()
            .find(|&(index, c)| {
                c == '-' && text[index + 1..].starts_with(|next: char| next.is_ascii_digit())
            })
            .map(|(index, _)| index);
        match split {
            Some(index) => Software {
                name: text[..index].to_string(),
                version: text[index + 1..].to_string(),
                options: Vec::new(),
            },
            None => Software {
                name: text.to_string(),
                version: String::new(),
                options: Vec::new(),
            },
        }
    }
}

impl fmt::Display for Software {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}-{}", self.name, self.version)
        }
    }
}

/// How a requirement compares against the available software version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[default]
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

/// One software entry of a requirement together with its comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareEntry {
    pub software: Software,
    pub operator: ComparisonOperator,
}

/// An ordered list of software constraints, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoftwareRequirement {
    entries: Vec<SoftwareEntry>,
}

impl SoftwareRequirement {
    pub fn add(&mut self, software: Software, operator: ComparisonOperator) {
        self.entries.push(SoftwareEntry { software, operator });
    }

    pub fn entries(&self) -> &[SoftwareEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
