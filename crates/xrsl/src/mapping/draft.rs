//! Walking one request unit into a job description and its alternatives.

use std::mem;

use tracing::{debug, trace, warn};
use xrsl_semantics::{
    AttributeId, Dialect, XRSL_NAMESPACE, is_unsupported_globus_attribute, resolve_attribute,
};

use super::attributes;
use super::deferred;
use super::error::MappingError;
use super::values::suggestions;
use crate::job::JobDescription;
use crate::parser::{BoolOp, Condition, Location, Rsl};

/// A deferred attribute value and where it was written.
#[derive(Debug, Clone)]
pub(super) struct Deferred<T> {
    pub(super) value: T,
    pub(super) location: Option<Location>,
}

impl<T> Deferred<T> {
    pub(super) fn new(value: T, condition: &Condition) -> Deferred<T> {
        Deferred {
            value,
            location: condition.location,
        }
    }
}

/// Attributes resolved after the whole unit has been walked.
#[derive(Debug, Clone, Default)]
pub(super) struct PendingAttributes {
    pub(super) executables: Option<Deferred<Vec<String>>>,
    pub(super) cache: Option<Deferred<String>>,
    pub(super) ftp_threads: Option<Deferred<String>>,
    pub(super) count_per_node: Option<Deferred<String>>,
    pub(super) join: Option<Deferred<String>>,
    pub(super) grid_time: Option<Deferred<String>>,
}

/// A job description under construction.
///
/// Alternatives are kept flat: a branch's own alternatives are appended
/// right after it.
#[derive(Debug, Clone, Default)]
struct Draft {
    job: JobDescription,
    pending: PendingAttributes,
    alternatives: Vec<Draft>,
}

impl Draft {
    fn add_alternative(&mut self, mut branch: Draft) {
        let nested = mem::take(&mut branch.alternatives);
        self.alternatives.push(branch);
        self.alternatives.extend(nested);
    }
}

/// Applies request units to job descriptions, collecting semantic errors.
#[derive(Debug)]
pub(super) struct Mapper {
    dialect: Dialect,
    errors: Vec<MappingError>,
}

impl Mapper {
    pub(super) fn new(dialect: Dialect) -> Mapper {
        Mapper {
            dialect,
            errors: Vec::new(),
        }
    }

    /// Every error reported so far, each once, in the order found.
    pub(super) fn into_errors(self) -> Vec<MappingError> {
        self.errors
    }

    pub(super) fn report(&mut self, error: MappingError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }

    /// Build the job description for one unit of an evaluated document.
    ///
    /// The submitted text is recorded as the `clientxrsl` attribute unless
    /// the unit supplies its own.
    pub(super) fn map_unit(&mut self, unit: &Rsl, source: &str) -> JobDescription {
        let mut draft = Draft::default();
        self.walk(unit, &mut draft);
        self.finish(draft, source)
    }

    fn walk(&mut self, rsl: &Rsl, draft: &mut Draft) {
        match rsl {
            Rsl::Condition(condition) => self.condition(condition, draft),
            Rsl::Boolean(boolean) => match boolean.op {
                BoolOp::And | BoolOp::Multi => {
                    for child in &boolean.children {
                        self.walk(child, draft);
                    }
                }
                BoolOp::Or => self.disjunction(&boolean.children, draft),
            },
        }
    }

    /// The first branch continues the live draft; every other branch starts
    /// from a copy taken before the first was applied and becomes an
    /// alternative.
    fn disjunction(&mut self, branches: &[Rsl], draft: &mut Draft) {
        let Some((first, rest)) = branches.split_first() else {
            return;
        };
        let base = draft.clone();
        self.walk(first, draft);
        for branch in rest {
            let mut alternative = base.clone();
            self.walk(branch, &mut alternative);
            draft.add_alternative(alternative);
        }
    }

    fn condition(&mut self, condition: &Condition, draft: &mut Draft) {
        let name = condition.attribute();
        let Some(id) = resolve_attribute(name) else {
            if is_unsupported_globus_attribute(name) {
                warn!(
                    attribute = name,
                    "the specified Globus attribute is not supported and is ignored"
                );
            } else {
                debug!(
                    attribute = name,
                    suggestions = ?suggestions(name, self.dialect),
                    "unknown xRSL attribute, ignoring it"
                );
            }
            return;
        };
        if id.is_deferred() {
            trace!(attribute = name, "holding attribute until the request is walked");
        }
        let dialect = self.dialect;
        let mut results = vec![attributes::apply(
            id,
            condition,
            &mut draft.job,
            &mut draft.pending,
            dialect,
        )];
        for alternative in &mut draft.alternatives {
            results.push(attributes::apply(
                id,
                condition,
                &mut alternative.job,
                &mut alternative.pending,
                dialect,
            ));
        }
        for result in results {
            if let Err(error) = result {
                self.report(error);
            }
        }
    }

    fn finish(&mut self, draft: Draft, source: &str) -> JobDescription {
        let Draft {
            mut job,
            pending,
            alternatives,
        } = draft;
        for error in deferred::resolve(&mut job, pending, self.dialect) {
            self.report(error);
        }
        if job
            .other_attribute(XRSL_NAMESPACE, AttributeId::ClientXrsl.name())
            .is_none()
        {
            job.set_other_attribute(XRSL_NAMESPACE, AttributeId::ClientXrsl.name(), source);
        }
        if job.application.executable.path.is_empty() && self.needs_executable(&job) {
            self.report(MappingError::MissingExecutable);
        }
        for alternative in alternatives {
            let alternative = self.finish(alternative, source);
            job.add_alternative(alternative);
        }
        job
    }

    /// Service-side requests other than `action=request` carry no job.
    fn needs_executable(&self, job: &JobDescription) -> bool {
        match self.dialect {
            Dialect::Client => true,
            Dialect::GridManager => job
                .other_attribute(XRSL_NAMESPACE, AttributeId::Action.name())
                .is_none_or(|action| action == "request"),
        }
    }
}
