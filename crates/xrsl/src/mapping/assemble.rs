//! Rendering a job description as an xRSL syntax tree.

use std::iter;

use xrsl_semantics::{AttributeId, Dialect, XRSL_NAMESPACE, split_side_table_key};

use super::deferred::gridtime_benchmark;
use super::error::AssembleError;
use super::notify::format_notify;
use crate::job::{
    ComparisonOperator, DataUrl, ExclusiveExecution, JobDescription, ScalableTime,
    SoftwareRequirement,
};
use crate::parser::{BoolOp, Boolean, Condition, RelOp, Rsl, Value, ValueList};

/// Conditions of the `&` group under construction.
#[derive(Debug, Default)]
struct Conjunction {
    children: Vec<Rsl>,
}

impl Conjunction {
    fn push(&mut self, id: AttributeId, op: RelOp, values: ValueList) {
        self.children
            .push(Rsl::Condition(Condition::new(id.name(), op, values)));
    }

    fn single(&mut self, id: AttributeId, value: impl Into<String>) {
        self.push(id, RelOp::Eq, ValueList::literals([value.into()]));
    }

    fn single_if_set(&mut self, id: AttributeId, value: &str) {
        if !value.is_empty() {
            self.single(id, value);
        }
    }

    fn into_rsl(self) -> Rsl {
        Rsl::Boolean(Boolean::new(BoolOp::And, self.children))
    }
}

/// Build the `&` group describing `job`, without its alternatives.
pub fn assemble_rsl(job: &JobDescription, dialect: Dialect) -> Result<Rsl, AssembleError> {
    let application = &job.application;
    let resources = &job.resources;
    let mut out = Conjunction::default();

    if application.executable.path.is_empty() {
        return Err(AssembleError::MissingExecutable);
    }
    out.single(AttributeId::Executable, &application.executable.path);
    if !application.executable.arguments.is_empty() {
        out.push(
            AttributeId::Arguments,
            RelOp::Eq,
            ValueList::literals(&application.executable.arguments),
        );
    }
    out.single_if_set(AttributeId::Stdin, &application.input);
    streams(&mut out, job, dialect);

    times(&mut out, job, dialect);
    if let Some(memory) = resources.individual_physical_memory {
        out.single(AttributeId::Memory, memory.to_string());
    }
    if let Some(disk) = resources.disk_space {
        out.single(AttributeId::Disk, disk.to_string());
    }
    if !application.environment.is_empty() {
        let pairs = application
            .environment
            .iter()
            .map(|(name, value)| Value::sequence([name, value]))
            .collect();
        out.push(AttributeId::Environment, RelOp::Eq, ValueList::new(pairs));
    }

    staging(&mut out, job, dialect)?;

    if !resources.queue_name.is_empty() {
        out.single(AttributeId::Queue, &resources.queue_name);
    }
    if let Some(rerun) = application.rerun {
        out.single(AttributeId::Rerun, rerun.to_string());
    }
    if let Some(lifetime) = resources.session_life_time {
        out.single(AttributeId::LifeTime, format_time(lifetime.seconds(), dialect));
    }
    software(&mut out, AttributeId::RuntimeEnvironment, &resources.run_time_environment);
    software(&mut out, AttributeId::Middleware, &resources.ce_type);
    software(&mut out, AttributeId::OpSys, &resources.operating_system);
    out.single_if_set(AttributeId::Architecture, &resources.platform);

    let slots = &resources.slot_requirement;
    if let Some(count) = slots.number_of_slots {
        out.single(AttributeId::Count, count.to_string());
    }
    if let Some(per_node) = slots.slots_per_host {
        if slots.number_of_slots.is_none() {
            return Err(AssembleError::SlotsPerHostWithoutCount);
        }
        out.single(AttributeId::CountPerNode, per_node.to_string());
    }
    match slots.exclusive_execution {
        ExclusiveExecution::Default => {}
        ExclusiveExecution::True => out.single(AttributeId::ExclusiveExecution, "yes"),
        ExclusiveExecution::False => out.single(AttributeId::ExclusiveExecution, "no"),
    }

    if let Some(start) = &application.processing_start_time {
        out.single(AttributeId::StartTime, start);
    }
    out.single_if_set(AttributeId::GmLog, &application.log_dir);
    out.single_if_set(AttributeId::JobName, &job.identification.job_name);
    if let Some(acl) = &application.access_control {
        out.single(AttributeId::Acl, acl);
    }
    if !application.notifications.is_empty() {
        let mut values = Vec::with_capacity(application.notifications.len());
        for notification in &application.notifications {
            if notification.states.is_empty() {
                return Err(AssembleError::EmptyNotification {
                    email: notification.email.clone(),
                });
            }
            values.push(format_notify(notification));
        }
        out.push(AttributeId::Notify, RelOp::Eq, ValueList::literals(values));
    }
    for url in &application.remote_logging {
        out.single(AttributeId::JobReport, url);
    }
    for url in &application.credential_service {
        out.single(AttributeId::CredentialServer, url);
    }
    if let Some(priority) = application.priority {
        out.single(AttributeId::Priority, priority.to_string());
    }
    let access = resources.node_access;
    if access.inbound() || access.outbound() {
        let directions = [(access.inbound(), "inbound"), (access.outbound(), "outbound")]
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name));
        out.push(AttributeId::NodeAccess, RelOp::Eq, ValueList::literals(directions));
    }
    if application.dry_run {
        out.single(AttributeId::DryRun, "yes");
    }

    side_table(&mut out, job, dialect);
    Ok(out.into_rsl())
}

/// Equal stdout and stderr are written as `join` in the client dialect.
fn streams(out: &mut Conjunction, job: &JobDescription, dialect: Dialect) {
    let application = &job.application;
    let joined = !application.output.is_empty() && application.output == application.error;
    out.single_if_set(AttributeId::Stdout, &application.output);
    if joined && dialect == Dialect::Client {
        out.single(AttributeId::Join, "yes");
    } else {
        out.single_if_set(AttributeId::Stderr, &application.error);
    }
}

/// Client values count in minutes unless a number of seconds is needed;
/// service-side values are always seconds.
fn format_time(seconds: i64, dialect: Dialect) -> String {
    match dialect {
        Dialect::GridManager => seconds.to_string(),
        Dialect::Client if seconds % 60 == 0 => seconds.div_euclid(60).to_string(),
        Dialect::Client => format!("{seconds}s"),
    }
}

fn is_grid_time(job: &JobDescription) -> bool {
    let resources = &job.resources;
    let (cpu, wall) = (&resources.total_cpu_time, &resources.individual_wall_time);
    let slots = i64::from(resources.slot_requirement.number_of_slots.unwrap_or(1).max(1));
    let benchmark = Some(gridtime_benchmark());
    cpu.benchmark == benchmark
        && wall.benchmark == benchmark
        && cpu
            .range
            .max
            .is_some_and(|max| wall.range.max == Some(max.saturating_mul(slots)))
}

fn times(out: &mut Conjunction, job: &JobDescription, dialect: Dialect) {
    let resources = &job.resources;
    if is_grid_time(job) {
        if let Some(max) = resources.total_cpu_time.range.max {
            out.single(AttributeId::GridTime, format_time(max, dialect));
        }
        return;
    }
    cpu_time(out, &resources.total_cpu_time, dialect);
    if let Some(max) = resources.individual_wall_time.range.max {
        out.single(AttributeId::WallTime, format_time(max, dialect));
    }
}

fn cpu_time(out: &mut Conjunction, cpu: &ScalableTime, dialect: Dialect) {
    let Some(max) = cpu.range.max else {
        return;
    };
    match &cpu.benchmark {
        Some(benchmark) => {
            let tuple = Value::sequence([
                benchmark.name.clone(),
                benchmark.value.to_string(),
                format_time(max, dialect),
            ]);
            out.push(AttributeId::Benchmarks, RelOp::Eq, ValueList::new(vec![tuple]));
        }
        None => out.single(AttributeId::CpuTime, format_time(max, dialect)),
    }
}

/// The location and option fields following a file name.
fn url_fields(url: &DataUrl, location: String) -> Vec<String> {
    let mut fields = vec![location];
    fields.extend(url.options.iter().map(|(key, value)| format!("{key}={value}")));
    for replica in &url.locations {
        fields.push(format!("location={}", replica.url));
        fields.extend(
            replica
                .options
                .iter()
                .map(|(key, value)| format!("{key}={value}")),
        );
    }
    fields
}

fn staging(
    out: &mut Conjunction,
    job: &JobDescription,
    dialect: Dialect,
) -> Result<(), AssembleError> {
    let staging = &job.data_staging;
    let mut inputs = Vec::new();
    for file in &staging.input_files {
        if file.name.is_empty() {
            return Err(AssembleError::EmptyInputFileName);
        }
        let size = || match dialect {
            Dialect::GridManager => file
                .file_size
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            Dialect::Client => String::new(),
        };
        let fields = match file.sources.first() {
            Some(source) if source.is_local() => url_fields(source, size()),
            Some(source) => url_fields(source, source.url.clone()),
            None => vec![size()],
        };
        inputs.push(Value::sequence(iter::once(file.name.clone()).chain(fields)));
    }
    if !inputs.is_empty() {
        out.push(AttributeId::InputFiles, RelOp::Eq, ValueList::new(inputs));
    }

    let executables: Vec<&str> = staging
        .input_files
        .iter()
        .filter(|file| file.is_executable)
        .map(|file| file.name.as_str())
        .collect();
    if !executables.is_empty() {
        out.push(AttributeId::Executables, RelOp::Eq, ValueList::literals(executables));
    }

    let mut outputs = Vec::new();
    for file in &staging.output_files {
        if file.name.is_empty() {
            return Err(AssembleError::EmptyOutputFileName);
        }
        let fields = match file.targets.first() {
            Some(target) => url_fields(target, target.url.clone()),
            None => vec![String::new()],
        };
        outputs.push(Value::sequence(iter::once(file.name.clone()).chain(fields)));
    }
    if !outputs.is_empty() {
        out.push(AttributeId::OutputFiles, RelOp::Eq, ValueList::new(outputs));
    }
    Ok(())
}

fn relation(operator: ComparisonOperator) -> RelOp {
    match operator {
        ComparisonOperator::Equal => RelOp::Eq,
        ComparisonOperator::NotEqual => RelOp::Ne,
        ComparisonOperator::LessThan => RelOp::Lt,
        ComparisonOperator::GreaterThan => RelOp::Gt,
        ComparisonOperator::LessThanOrEqual => RelOp::Le,
        ComparisonOperator::GreaterThanOrEqual => RelOp::Ge,
    }
}

/// One condition per entry, carrying the entry's comparison.
fn software(out: &mut Conjunction, id: AttributeId, requirement: &SoftwareRequirement) {
    for entry in requirement.entries() {
        let values = iter::once(entry.software.to_string())
            .chain(entry.software.options.iter().cloned());
        out.push(id, relation(entry.operator), ValueList::literals(values));
    }
}

/// Attributes of the xRSL namespace without a dedicated field.
///
/// `action` is only written for the service side; entries of other
/// namespaces are skipped.
fn side_table(out: &mut Conjunction, job: &JobDescription, dialect: Dialect) {
    for (key, value) in &job.other_attributes {
        let Some((namespace, name)) = split_side_table_key(key) else {
            continue;
        };
        if namespace != XRSL_NAMESPACE {
            continue;
        }
        if name == AttributeId::Action.name() && !dialect.is_service_side() {
            continue;
        }
        out.children.push(Rsl::Condition(Condition::new(
            name,
            RelOp::Eq,
            ValueList::literals([value]),
        )));
    }
}
