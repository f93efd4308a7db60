//! Translation between evaluated xRSL trees and job descriptions.
//!
//! The parse direction walks each request unit, applying every condition to
//! the job description and to each alternative produced so far. Attributes
//! that depend on others are held back and resolved once the unit has been
//! walked. The assemble direction writes a job description back out as a
//! single `&` group.

mod assemble;
mod attributes;
mod deferred;
mod draft;
mod error;
mod notify;
mod values;

use tracing::debug;
use xrsl_semantics::Dialect;

pub use assemble::assemble_rsl;
pub use error::{AssembleError, MappingError};

use crate::interpreter::split_rsl;
use crate::job::JobDescription;
use crate::parser::Rsl;
use draft::Mapper;

/// Build one job description per request unit of an evaluated document.
///
/// `source` is the document text as submitted. Every semantic error found
/// in any unit or alternative is returned, each once, in document order.
pub fn map_rsl(
    evaluated: &Rsl,
    source: &str,
    dialect: Dialect,
) -> Result<Vec<JobDescription>, Vec<MappingError>> {
    let units = split_rsl(evaluated);
    if dialect == Dialect::GridManager && units.len() > 1 {
        return Err(vec![MappingError::MultipleRequests]);
    }
    let mut mapper = Mapper::new(dialect);
    let jobs: Vec<JobDescription> = units
        .into_iter()
        .map(|unit| mapper.map_unit(unit, source))
        .collect();
    let errors = mapper.into_errors();
    if errors.is_empty() {
        debug!(jobs = jobs.len(), "mapped xRSL document");
        Ok(jobs)
    } else {
        Err(errors)
    }
}
