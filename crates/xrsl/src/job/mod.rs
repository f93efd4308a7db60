//! The structured job description populated from and rendered to xRSL.

mod application;
mod period;
mod resources;
mod software;
mod staging;

use std::collections::BTreeMap;
use std::mem;

use serde::{Deserialize, Serialize};

pub use application::{Application, Executable, Notification};
pub use period::{Period, PeriodError};
pub use resources::{
    Benchmark, ExclusiveExecution, NodeAccess, Range, Resources, ScalableTime, SlotRequirement,
};
pub use software::{ComparisonOperator, Software, SoftwareEntry, SoftwareRequirement};
pub use staging::{DataLocation, DataStaging, DataUrl, InputFile, OutputFile, UrlError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identification {
    pub job_name: String,
}

/// A single compute job request.
///
/// A description may carry alternatives: complete descriptions of the same
/// request that a broker can try in order. [`JobDescription::use_alternative`]
/// swaps the next alternative into view; [`JobDescription::use_original`]
/// brings the first view back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDescription {
    pub identification: Identification,
    pub application: Application,
    pub resources: Resources,
    pub data_staging: DataStaging,
    /// Attributes without a dedicated field, keyed `<namespace>;<name>`.
    pub other_attributes: BTreeMap<String, String>,
    alternatives: Vec<JobDescription>,
    current: usize,
}

impl JobDescription {
    pub fn new() -> JobDescription {
        JobDescription::default()
    }

    /// Append an alternative. Alternatives of `job` are appended after it.
    pub fn add_alternative(&mut self, mut job: JobDescription) {
        let nested = mem::take(&mut job.alternatives);
        job.current = 0;
        self.alternatives.push(job);
        for alternative in nested {
            self.add_alternative(alternative);
        }
    }

    /// The descriptions not currently in view, in order.
    pub fn alternatives(&self) -> &[JobDescription] {
        &self.alternatives
    }

    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }

    pub fn remove_alternatives(&mut self) {
        self.alternatives.clear();
        self.current = 0;
    }

    /// Swap the next alternative into view.
    ///
    /// Returns `false` when every alternative has been used.
    pub fn use_alternative(&mut self) -> bool {
        if self.current >= self.alternatives.len() {
            return false;
        }
        let current = self.current;
        let mut alternatives = mem::take(&mut self.alternatives);
        let next = alternatives.remove(current);
        let previous = mem::replace(self, next);
        alternatives.insert(current, previous);
        self.alternatives = alternatives;
        self.current = current + 1;
        true
    }

    /// Bring the original description back into view.
    pub fn use_original(&mut self) {
        if self.current == 0 {
            return;
        }
        let current = self.current;
        let mut alternatives = mem::take(&mut self.alternatives);
        let original = alternatives.remove(0);
        let shown = mem::replace(self, original);
        alternatives.insert(current - 1, shown);
        self.alternatives = alternatives;
        self.current = 0;
    }

    /// Side-table lookup by namespace and attribute name.
    pub fn other_attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        self.other_attributes
            .get(&xrsl_semantics::side_table_key(namespace, name))
            .map(String::as_str)
    }

    pub fn set_other_attribute(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
        self.other_attributes
            .insert(xrsl_semantics::side_table_key(namespace, name), value.into());
    }
}
