//! Resolution of attributes that depend on others.
//!
//! Runs once per job description after its unit has been walked, in the
//! order executables, ftpthreads, cache, countpernode, join, gridtime.

use xrsl_semantics::{AttributeId, Dialect, XRSL_NAMESPACE};

use super::draft::{Deferred, PendingAttributes};
use super::error::MappingError;
use crate::job::{Benchmark, JobDescription, Period};

const GRIDTIME_BENCHMARK: &str = "clock rate";
const GRIDTIME_CLOCK_RATE: f64 = 2800.0;
const MAX_FTP_THREADS: u32 = 10;

/// The benchmark `gridtime` limits are expressed against.
pub(super) fn gridtime_benchmark() -> Benchmark {
    Benchmark {
        name: GRIDTIME_BENCHMARK.to_string(),
        value: GRIDTIME_CLOCK_RATE,
    }
}

pub(super) fn resolve(
    job: &mut JobDescription,
    pending: PendingAttributes,
    dialect: Dialect,
) -> Vec<MappingError> {
    let PendingAttributes {
        executables,
        cache,
        ftp_threads,
        count_per_node,
        join,
        grid_time,
    } = pending;
    let steps = [
        executables.map_or(Ok(()), |value| mark_executables(job, value)),
        ftp_threads.map_or(Ok(()), |value| apply_ftp_threads(job, value)),
        cache.map_or(Ok(()), |value| {
            apply_cache(job, &value.value);
            Ok(())
        }),
        count_per_node.map_or(Ok(()), |value| apply_count_per_node(job, value)),
        join.map_or(Ok(()), |value| match dialect {
            Dialect::Client => apply_join(job, value),
            Dialect::GridManager => {
                keep(job, AttributeId::Join, value.value);
                Ok(())
            }
        }),
        grid_time.map_or(Ok(()), |value| match dialect {
            Dialect::Client => apply_grid_time(job, value, dialect),
            Dialect::GridManager => {
                keep(job, AttributeId::GridTime, value.value);
                Ok(())
            }
        }),
    ];
    steps.into_iter().filter_map(Result::err).collect()
}

fn keep(job: &mut JobDescription, id: AttributeId, value: String) {
    job.set_other_attribute(XRSL_NAMESPACE, id.name(), value);
}

fn mark_executables(
    job: &mut JobDescription,
    names: Deferred<Vec<String>>,
) -> Result<(), MappingError> {
    for name in names.value {
        let file = job
            .data_staging
            .input_files
            .iter_mut()
            .find(|file| file.name == name)
            .ok_or_else(|| MappingError::UnknownExecutable {
                name: name.clone(),
                location: names.location,
            })?;
        file.is_executable = true;
    }
    Ok(())
}

fn apply_ftp_threads(
    job: &mut JobDescription,
    threads: Deferred<String>,
) -> Result<(), MappingError> {
    let out_of_range = || MappingError::OutOfRange {
        attribute: AttributeId::FtpThreads.name().to_string(),
        value: threads.value.clone(),
        range: "1..10",
        location: threads.location,
    };
    let count: u32 = threads.value.trim().parse().map_err(|_| out_of_range())?;
    if !(1..=MAX_FTP_THREADS).contains(&count) {
        return Err(out_of_range());
    }
    let staging = &mut job.data_staging;
    let sources = staging
        .input_files
        .iter_mut()
        .flat_map(|file| file.sources.iter_mut());
    let targets = staging
        .output_files
        .iter_mut()
        .flat_map(|file| file.targets.iter_mut());
    for url in sources.chain(targets) {
        url.set_option("threads", count.to_string());
    }
    Ok(())
}

/// Applies to the sources of every input file that is not an executable.
fn apply_cache(job: &mut JobDescription, cache: &str) {
    let cache = cache.to_ascii_lowercase();
    for file in &mut job.data_staging.input_files {
        if file.is_executable {
            continue;
        }
        for source in &mut file.sources {
            source.set_option("cache", cache.as_str());
        }
    }
}

fn apply_count_per_node(
    job: &mut JobDescription,
    per_node: Deferred<String>,
) -> Result<(), MappingError> {
    let slots = &mut job.resources.slot_requirement;
    if slots.number_of_slots.is_none() {
        return Err(MappingError::CountPerNodeWithoutCount {
            location: per_node.location,
        });
    }
    let value = per_node.value.trim().parse().map_err(|_| MappingError::InvalidValue {
        attribute: AttributeId::CountPerNode.name().to_string(),
        value: per_node.value.clone(),
        location: per_node.location,
    })?;
    slots.slots_per_host = Some(value);
    Ok(())
}

fn apply_join(job: &mut JobDescription, join: Deferred<String>) -> Result<(), MappingError> {
    if !matches!(join.value.to_ascii_lowercase().as_str(), "yes" | "true") {
        return Ok(());
    }
    let application = &mut job.application;
    if application.output.is_empty() {
        return Err(MappingError::JoinWithoutStdout {
            location: join.location,
        });
    }
    if !application.error.is_empty() && application.error != application.output {
        return Err(MappingError::JoinConflict {
            stdout: application.output.clone(),
            stderr: application.error.clone(),
            location: join.location,
        });
    }
    application.error = application.output.clone();
    Ok(())
}

/// Sets both the total CPU time and the wall time, the latter scaled by the
/// slot count.
fn apply_grid_time(
    job: &mut JobDescription,
    grid_time: Deferred<String>,
    dialect: Dialect,
) -> Result<(), MappingError> {
    let resources = &mut job.resources;
    if resources.total_cpu_time.is_set() || resources.individual_wall_time.is_set() {
        return Err(MappingError::GridTimeConflict {
            location: grid_time.location,
        });
    }
    let period = Period::parse(&grid_time.value, dialect.time_unit_seconds()).map_err(|source| {
        MappingError::Period {
            attribute: AttributeId::GridTime.name().to_string(),
            source,
            location: grid_time.location,
        }
    })?;
    let slots = i64::from(resources.slot_requirement.number_of_slots.unwrap_or(1).max(1));
    resources.total_cpu_time.range.max = Some(period.seconds());
    resources.total_cpu_time.benchmark = Some(gridtime_benchmark());
    resources.individual_wall_time.range.max = Some(period.seconds().saturating_mul(slots));
    resources.individual_wall_time.benchmark = Some(gridtime_benchmark());
    Ok(())
}
