//! Per-attribute rules of the parse direction.

use tracing::warn;
use xrsl_semantics::{ACTIONS, AttributeId, BROKER_NAMESPACE, Dialect, XRSL_NAMESPACE};

use super::draft::{Deferred, PendingAttributes};
use super::error::MappingError;
use super::notify::parse_notify;
use super::values::{Arity, invalid, list, number, sequences, single};
use crate::job::{
    Benchmark, ComparisonOperator, DataUrl, ExclusiveExecution, InputFile, JobDescription, NodeAccess,
    OutputFile, Period, Software, SoftwareRequirement,
};
use crate::parser::{Condition, RelOp};

/// Apply one condition to a job description.
pub(super) fn apply(
    id: AttributeId,
    condition: &Condition,
    job: &mut JobDescription,
    pending: &mut PendingAttributes,
    dialect: Dialect,
) -> Result<(), MappingError> {
    let application = &mut job.application;
    let resources = &mut job.resources;
    match id {
        AttributeId::Executable => {
            application.executable.path = single(condition)?.to_string();
        }
        AttributeId::Arguments => {
            application.executable.arguments = owned(list(condition)?);
        }
        AttributeId::Stdin => application.input = single(condition)?.to_string(),
        AttributeId::Stdout => application.output = single(condition)?.to_string(),
        AttributeId::Stderr => application.error = single(condition)?.to_string(),
        AttributeId::InputFiles => input_files(condition, job, dialect)?,
        AttributeId::OutputFiles => output_files(condition, job)?,
        AttributeId::Executables => {
            pending.executables = Some(Deferred::new(owned(list(condition)?), condition));
        }
        AttributeId::Cache => {
            pending.cache = Some(Deferred::new(single(condition)?.to_string(), condition));
        }
        AttributeId::FtpThreads => {
            pending.ftp_threads = Some(Deferred::new(single(condition)?.to_string(), condition));
        }
        AttributeId::CountPerNode => {
            pending.count_per_node =
                Some(Deferred::new(single(condition)?.to_string(), condition));
        }
        AttributeId::Join => {
            pending.join = Some(Deferred::new(single(condition)?.to_string(), condition));
        }
        AttributeId::GridTime => {
            pending.grid_time = Some(Deferred::new(single(condition)?.to_string(), condition));
        }
        AttributeId::Queue => queue(condition, job, dialect)?,
        AttributeId::StartTime => {
            application.processing_start_time = Some(single(condition)?.to_string());
        }
        AttributeId::LifeTime => {
            resources.session_life_time = Some(period(condition, single(condition)?, dialect)?);
        }
        AttributeId::CpuTime => {
            let time = period(condition, single(condition)?, dialect)?;
            resources.total_cpu_time.range.max = Some(time.seconds());
        }
        AttributeId::WallTime => {
            let time = period(condition, single(condition)?, dialect)?;
            resources.individual_wall_time.range.max = Some(time.seconds());
        }
        AttributeId::Benchmarks => benchmarks(condition, job, dialect)?,
        AttributeId::Memory => {
            resources.individual_physical_memory = Some(number(condition, single(condition)?)?);
        }
        AttributeId::Disk => {
            resources.disk_space = Some(number(condition, single(condition)?)?);
        }
        AttributeId::RuntimeEnvironment => {
            let values = list(condition)?;
            let Some((name, options)) = values.split_first() else {
                return Err(MappingError::NotSingleValue {
                    attribute: condition.attribute().to_string(),
                    location: condition.location,
                });
            };
            let mut software = Software::parse(name);
            software.options = owned(options.to_vec());
            resources
                .run_time_environment
                .add(software, comparison(condition.op));
        }
        AttributeId::Middleware => software(condition, &mut resources.ce_type)?,
        AttributeId::OpSys => software(condition, &mut resources.operating_system)?,
        AttributeId::GmLog => application.log_dir = single(condition)?.to_string(),
        AttributeId::JobName => job.identification.job_name = single(condition)?.to_string(),
        AttributeId::Acl => application.access_control = Some(single(condition)?.to_string()),
        AttributeId::Notify => {
            for value in list(condition)? {
                let entry = parse_notify(value).map_err(|reason| MappingError::Notify {
                    value: value.to_string(),
                    reason,
                    location: condition.location,
                })?;
                for email in entry.emails {
                    application.notify(email, &entry.states);
                }
            }
        }
        AttributeId::Rerun => application.rerun = Some(number(condition, single(condition)?)?),
        AttributeId::Priority => {
            let priority: u32 = number(condition, single(condition)?)?;
            if priority == 0 {
                return Err(MappingError::OutOfRange {
                    attribute: condition.attribute().to_string(),
                    value: priority.to_string(),
                    range: "1..100",
                    location: condition.location,
                });
            }
            if priority > 100 {
                warn!(priority, "priority is too large, using 100 instead");
            }
            application.priority = Some(priority.min(100));
        }
        AttributeId::Architecture => resources.platform = single(condition)?.to_string(),
        AttributeId::NodeAccess => {
            for value in list(condition)? {
                let access = match value {
                    "inbound" => NodeAccess::Inbound,
                    "outbound" => NodeAccess::Outbound,
                    _ => return Err(invalid(condition, value)),
                };
                resources.node_access = resources.node_access.with(access);
            }
        }
        AttributeId::DryRun => {
            let value = single(condition)?.to_ascii_lowercase();
            application.dry_run = value == "yes" || value == "dryrun";
        }
        AttributeId::RslSubstitution => {}
        AttributeId::Environment => {
            for pair in sequences(condition, Arity::Exactly(2))? {
                if let [name, value] = pair.as_slice() {
                    application
                        .environment
                        .push(((*name).to_string(), (*value).to_string()));
                }
            }
        }
        AttributeId::Count => {
            resources.slot_requirement.number_of_slots = Some(number(condition, single(condition)?)?);
        }
        AttributeId::ExclusiveExecution => {
            let value = single(condition)?;
            resources.slot_requirement.exclusive_execution =
                match value.to_ascii_lowercase().as_str() {
                    "yes" | "true" => ExclusiveExecution::True,
                    "no" | "false" => ExclusiveExecution::False,
                    _ => return Err(invalid(condition, value)),
                };
        }
        AttributeId::JobReport => {
            let url = url(condition, single(condition)?)?;
            application.remote_logging.push(url.url);
        }
        AttributeId::CredentialServer => {
            let url = url(condition, single(condition)?)?;
            application.credential_service.push(url.url);
        }
        AttributeId::Action => {
            if !id.allowed_in(dialect) {
                return Err(MappingError::ActionNotAllowed {
                    location: condition.location,
                });
            }
            let action = single(condition)?;
            if !ACTIONS.contains(&action) {
                return Err(invalid(condition, action));
            }
            job.set_other_attribute(XRSL_NAMESPACE, id.name(), action);
        }
        AttributeId::Hostname
        | AttributeId::JobId
        | AttributeId::ClientXrsl
        | AttributeId::ClientSoftware
        | AttributeId::SaveState => {
            let value = single(condition)?;
            job.set_other_attribute(XRSL_NAMESPACE, id.name(), value);
        }
    }
    Ok(())
}

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

pub(super) fn comparison(op: RelOp) -> ComparisonOperator {
    match op {
        RelOp::Eq => ComparisonOperator::Equal,
        RelOp::Ne => ComparisonOperator::NotEqual,
        RelOp::Lt => ComparisonOperator::LessThan,
        RelOp::Gt => ComparisonOperator::GreaterThan,
        RelOp::Le => ComparisonOperator::LessThanOrEqual,
        RelOp::Ge => ComparisonOperator::GreaterThanOrEqual,
    }
}

pub(super) fn period(
    condition: &Condition,
    text: &str,
    dialect: Dialect,
) -> Result<Period, MappingError> {
    Period::parse(text, dialect.time_unit_seconds()).map_err(|source| MappingError::Period {
        attribute: condition.attribute().to_string(),
        source,
        location: condition.location,
    })
}

fn url(condition: &Condition, text: &str) -> Result<DataUrl, MappingError> {
    DataUrl::parse(text).map_err(|source| MappingError::Url {
        attribute: condition.attribute().to_string(),
        source,
        location: condition.location,
    })
}

fn software(
    condition: &Condition,
    requirement: &mut SoftwareRequirement,
) -> Result<(), MappingError> {
    requirement.add(Software::parse(single(condition)?), comparison(condition.op));
    Ok(())
}

/// Whether a file tuple's second field names no remote location.
///
/// Besides the empty string, a plain number is accepted there: it is the
/// size of a file uploaded by the client.
fn is_local_field(field: &str) -> bool {
    field.is_empty() || field.parse::<u64>().is_ok()
}

/// Build a URL from a file tuple's location and trailing `key=value`
/// options. A `location` option adds a replica of the URL, and the options
/// after it belong to that replica.
fn file_url(condition: &Condition, text: &str, options: &[&str]) -> Result<DataUrl, MappingError> {
    let mut data_url = url(condition, text)?;
    for option in options {
        let Some((key, value)) = option.split_once('=') else {
            return Err(MappingError::FileOption {
                option: (*option).to_string(),
                location: condition.location,
            });
        };
        if key == "location" {
            url(condition, value)?;
            data_url.add_location(value);
        } else if let Some(replica) = data_url.locations.last_mut() {
            replica.set_option(key, value);
        } else {
            data_url.set_option(key, value);
        }
    }
    Ok(data_url)
}

fn input_files(
    condition: &Condition,
    job: &mut JobDescription,
    dialect: Dialect,
) -> Result<(), MappingError> {
    for tuple in sequences(condition, Arity::AtLeast(2))? {
        let [name, location, options @ ..] = tuple.as_slice() else {
            continue;
        };
        let mut file = InputFile {
            name: (*name).to_string(),
            ..InputFile::default()
        };
        if is_local_field(location) {
            file.file_size = location.parse().ok();
            if dialect == Dialect::Client {
                file.sources.push(file_url(condition, name, options)?);
            }
        } else {
            file.sources.push(file_url(condition, location, options)?);
        }
        job.data_staging.input_files.push(file);
    }
    Ok(())
}

fn output_files(condition: &Condition, job: &mut JobDescription) -> Result<(), MappingError> {
    for tuple in sequences(condition, Arity::AtLeast(2))? {
        let [name, location, options @ ..] = tuple.as_slice() else {
            continue;
        };
        let mut file = OutputFile {
            name: (*name).to_string(),
            targets: Vec::new(),
        };
        if !is_local_field(location) {
            file.targets.push(file_url(condition, location, options)?);
        }
        job.data_staging.output_files.push(file);
    }
    Ok(())
}

fn queue(
    condition: &Condition,
    job: &mut JobDescription,
    dialect: Dialect,
) -> Result<(), MappingError> {
    let name = single(condition)?;
    match (condition.op, dialect) {
        (RelOp::Eq, _) => job.resources.queue_name = name.to_string(),
        (RelOp::Ne, Dialect::Client) => {
            job.set_other_attribute(BROKER_NAMESPACE, "reject_queue", name);
        }
        (op, _) => {
            return Err(MappingError::InvalidOperator {
                attribute: condition.attribute().to_string(),
                op,
                location: condition.location,
            });
        }
    }
    Ok(())
}

/// The first `(name value time)` tuple with a numeric value sets the CPU
/// time and its benchmark.
fn benchmarks(
    condition: &Condition,
    job: &mut JobDescription,
    dialect: Dialect,
) -> Result<(), MappingError> {
    for tuple in sequences(condition, Arity::Exactly(3))? {
        let [name, value, time] = tuple.as_slice() else {
            continue;
        };
        let Ok(value) = value.trim().parse::<f64>() else {
            continue;
        };
        let time = period(condition, time, dialect)?;
        let cpu = &mut job.resources.total_cpu_time;
        cpu.range.max = Some(time.seconds());
        cpu.benchmark = Some(Benchmark {
            name: (*name).to_string(),
            value,
        });
        return Ok(());
    }
    Err(invalid(condition, &condition.values.to_string()))
}
