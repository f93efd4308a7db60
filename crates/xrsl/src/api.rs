//! Entry points turning xRSL text into job descriptions and back.

use std::fs;
use std::path::Path;

use bon::Builder;
use tracing::{debug, trace};
use xrsl_semantics::{Dialect, XRSL_LANGUAGE};

use crate::diagnostics::Diagnostics;
use crate::interpreter::RslParser;
use crate::job::JobDescription;
use crate::mapping::{AssembleError, assemble_rsl, map_rsl};

/// Parser and assembler for one language and dialect.
///
/// # Example
///
/// ```
/// use xrsl::{Dialect, JobDescriptionParser};
///
/// let parser = JobDescriptionParser::builder()
///     .dialect(Dialect::Client)
///     .build();
///
/// let jobs = parser.parse(r#"&(executable="/bin/echo")(arguments="hi")"#).unwrap();
/// assert_eq!(jobs[0].application.executable.path, "/bin/echo");
///
/// let text = parser.assemble(&jobs[0]).unwrap();
/// assert!(text.starts_with(r#"&(executable = "/bin/echo")(arguments = "hi")"#));
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct JobDescriptionParser {
    /// Requested description language. Parsing also accepts an empty
    /// string; assembling requires `nordugrid:xrsl`.
    #[builder(default = XRSL_LANGUAGE.to_string())]
    language: String,

    #[builder(default)]
    dialect: Dialect,
}

impl Default for JobDescriptionParser {
    fn default() -> Self {
        JobDescriptionParser::builder().build()
    }
}

impl JobDescriptionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse a document into one job description per request.
    ///
    /// Syntax errors stop at the first problem; semantic errors are all
    /// reported together.
    pub fn parse(&self, source: &str) -> Result<Vec<JobDescription>, Diagnostics> {
        if !self.language.is_empty() && self.language != XRSL_LANGUAGE {
            return Err(Diagnostics::wrong_language(format!(
                "language '{}' is not handled by the xRSL parser",
                self.language
            )));
        }
        trace!(dialect = ?self.dialect, "parsing xRSL job description");
        let parser = RslParser::new(source);
        let evaluated = parser.evaluate().map_err(Diagnostics::from)?;
        map_rsl(evaluated, parser.source(), self.dialect).map_err(|errors| {
            let mut diagnostics = Diagnostics::new();
            for error in errors {
                diagnostics.fail(error);
            }
            debug!(errors = diagnostics.entries().len(), "xRSL job description rejected");
            diagnostics
        })
    }

    /// Read and parse a job description file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<JobDescription>, Diagnostics> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            Diagnostics::failure(format!(
                "cannot read job description file {}: {e}",
                path.display()
            ))
        })?;
        self.parse(&source)
    }

    /// Write `job` as xRSL text. Alternatives are not written.
    pub fn assemble(&self, job: &JobDescription) -> Result<String, Diagnostics> {
        if self.language != XRSL_LANGUAGE {
            let error = AssembleError::UnsupportedLanguage {
                language: self.language.clone(),
            };
            return Err(Diagnostics::wrong_language(error.to_string()));
        }
        let rsl = assemble_rsl(job, self.dialect)?;
        Ok(rsl.to_string())
    }
}

/// Parse `source` with a language name and dialect hint (`""` or
/// `"GRIDMANAGER"`).
pub fn parse(
    source: &str,
    language: &str,
    dialect: &str,
) -> Result<Vec<JobDescription>, Diagnostics> {
    JobDescriptionParser::builder()
        .language(language)
        .dialect(Dialect::from_hint(dialect))
        .build()
        .parse(source)
}

/// Assemble `job` with a language name and dialect hint.
pub fn assemble(job: &JobDescription, language: &str, dialect: &str) -> Result<String, Diagnostics> {
    JobDescriptionParser::builder()
        .language(language)
        .dialect(Dialect::from_hint(dialect))
        .build()
        .assemble(job)
}
