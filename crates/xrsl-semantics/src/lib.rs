//! Shared xRSL semantic tables used by the parser, the evaluator and the
//! job description mapper.
//!
//! This crate centralizes attribute-name normalization, attribute resolution
//! and dialect rules so that the parse and assemble directions cannot drift
//! apart.

/// Language identifier accepted by the xRSL engine.
pub const XRSL_LANGUAGE: &str = "nordugrid:xrsl";

/// Side-table namespace used for attributes without a first-class field.
pub const XRSL_NAMESPACE: &str = "nordugrid:xrsl";

/// Side-table namespace used for broker hints such as rejected queues.
pub const BROKER_NAMESPACE: &str = "nordugrid:broker";

/// Characters that may not appear in unquoted tokens, attribute names or
/// variable names.
pub const RESERVED_CHARS: &str = "+&|()=<>!\"'^#$";

/// Wire name of the service-side dialect.
pub const GRIDMANAGER_HINT: &str = "GRIDMANAGER";

/// A named variant of the xRSL semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Client-side job requests. Time values default to minutes.
    #[default]
    Client,
    /// Service-side (grid manager) job requests. Time values default to
    /// seconds and the `action` attribute is accepted.
    GridManager,
}

impl Dialect {
    /// Resolve a dialect from its wire hint. Anything other than
    /// `"GRIDMANAGER"` selects the client dialect.
    pub fn from_hint(hint: &str) -> Dialect {
        if hint == GRIDMANAGER_HINT {
            Dialect::GridManager
        } else {
            Dialect::Client
        }
    }

    /// The wire hint for this dialect.
    pub fn hint(self) -> &'static str {
        match self {
            Dialect::Client => "",
            Dialect::GridManager => GRIDMANAGER_HINT,
        }
    }

    /// Number of seconds represented by a bare time value.
    pub fn time_unit_seconds(self) -> i64 {
        match self {
            Dialect::Client => 60,
            Dialect::GridManager => 1,
        }
    }

    pub fn is_service_side(self) -> bool {
        self == Dialect::GridManager
    }
}

/// Normalize an attribute name: lower-case it and drop every underscore.
///
/// `rsl_substitution` and `RSL_Substitution` both become `rslsubstitution`.
pub fn normalize_attribute(name: &str) -> String {
    name.chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Returns true if `s` contains any character from [`RESERVED_CHARS`].
pub fn contains_reserved(s: &str) -> bool {
    s.chars().any(|c| RESERVED_CHARS.contains(c))
}

/// Canonical xRSL attribute identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    Executable,
    Arguments,
    Stdin,
    Stdout,
    Stderr,
    InputFiles,
    Executables,
    Cache,
    OutputFiles,
    Queue,
    StartTime,
    LifeTime,
    CpuTime,
    WallTime,
    GridTime,
    Benchmarks,
    Memory,
    Disk,
    RuntimeEnvironment,
    Middleware,
    OpSys,
    Join,
    GmLog,
    JobName,
    FtpThreads,
    Acl,
    Notify,
    Rerun,
    Priority,
    Architecture,
    NodeAccess,
    DryRun,
    RslSubstitution,
    Environment,
    Count,
    CountPerNode,
    ExclusiveExecution,
    JobReport,
    CredentialServer,
    Action,
    Hostname,
    JobId,
    ClientXrsl,
    ClientSoftware,
    SaveState,
}

impl AttributeId {
    /// The normalized attribute name.
    pub fn name(self) -> &'static str {
        match self {
            AttributeId::Executable => "executable",
            AttributeId::Arguments => "arguments",
            AttributeId::Stdin => "stdin",
            AttributeId::Stdout => "stdout",
            AttributeId::Stderr => "stderr",
            AttributeId::InputFiles => "inputfiles",
            AttributeId::Executables => "executables",
            AttributeId::Cache => "cache",
            AttributeId::OutputFiles => "outputfiles",
            AttributeId::Queue => "queue",
            AttributeId::StartTime => "starttime",
            AttributeId::LifeTime => "lifetime",
            AttributeId::CpuTime => "cputime",
            AttributeId::WallTime => "walltime",
            AttributeId::GridTime => "gridtime",
            AttributeId::Benchmarks => "benchmarks",
            AttributeId::Memory => "memory",
            AttributeId::Disk => "disk",
            AttributeId::RuntimeEnvironment => "runtimeenvironment",
            AttributeId::Middleware => "middleware",
            AttributeId::OpSys => "opsys",
            AttributeId::Join => "join",
            AttributeId::GmLog => "gmlog",
            AttributeId::JobName => "jobname",
            AttributeId::FtpThreads => "ftpthreads",
            AttributeId::Acl => "acl",
            AttributeId::Notify => "notify",
            AttributeId::Rerun => "rerun",
            AttributeId::Priority => "priority",
            AttributeId::Architecture => "architecture",
            AttributeId::NodeAccess => "nodeaccess",
            AttributeId::DryRun => "dryrun",
            AttributeId::RslSubstitution => "rslsubstitution",
            AttributeId::Environment => "environment",
            AttributeId::Count => "count",
            AttributeId::CountPerNode => "countpernode",
            AttributeId::ExclusiveExecution => "exclusiveexecution",
            AttributeId::JobReport => "jobreport",
            AttributeId::CredentialServer => "credentialserver",
            AttributeId::Action => "action",
            AttributeId::Hostname => "hostname",
            AttributeId::JobId => "jobid",
            AttributeId::ClientXrsl => "clientxrsl",
            AttributeId::ClientSoftware => "clientsoftware",
            AttributeId::SaveState => "savestate",
        }
    }

    /// Attributes whose effect depends on attributes that may appear later
    /// in the document. They are collected while walking and resolved once
    /// the whole request has been applied.
    pub fn is_deferred(self) -> bool {
        matches!(
            self,
            AttributeId::Executables
                | AttributeId::Cache
                | AttributeId::FtpThreads
                | AttributeId::Join
                | AttributeId::GridTime
                | AttributeId::CountPerNode
        )
    }

    /// Whether the attribute is legal in the given dialect.
    pub fn allowed_in(self, dialect: Dialect) -> bool {
        self != AttributeId::Action || dialect.is_service_side()
    }
}

/// Resolve a normalized attribute name to its canonical id.
pub fn resolve_attribute(normalized: &str) -> Option<AttributeId> {
    ALL_ATTRIBUTES
        .iter()
        .copied()
        .find(|id| id.name() == normalized)
}

/// Attribute names accepted in the given dialect.
///
/// Used for diagnostics and typo suggestions.
pub fn accepted_attribute_names(dialect: Dialect) -> Vec<&'static str> {
    ALL_ATTRIBUTES
        .iter()
        .filter(|id| id.allowed_in(dialect))
        .map(|id| id.name())
        .collect()
}

/// Returns true for Globus RSL attributes that are recognized but ignored.
pub fn is_unsupported_globus_attribute(normalized: &str) -> bool {
    UNSUPPORTED_GLOBUS_ATTRIBUTES.contains(&normalized)
}

/// Build a two-part side-table key: `<namespace>;<name>`.
pub fn side_table_key(namespace: &str, name: &str) -> String {
    format!("{namespace};{name}")
}

/// Split a side-table key into namespace and attribute name.
pub fn split_side_table_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(';')
}

/// Job states a notification can be requested for, in flag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationState {
    Preparing,
    InLrms,
    Finishing,
    Finished,
    Deleted,
    Canceling,
}

impl NotificationState {
    /// Map a single notify flag character to its state.
    pub fn from_flag(flag: char) -> Option<NotificationState> {
        match flag {
            'b' => Some(NotificationState::Preparing),
            'q' => Some(NotificationState::InLrms),
            'f' => Some(NotificationState::Finishing),
            'e' => Some(NotificationState::Finished),
            'd' => Some(NotificationState::Deleted),
            'c' => Some(NotificationState::Canceling),
            _ => None,
        }
    }

    /// Resolve a state from its upper-case name.
    pub fn from_name(name: &str) -> Option<NotificationState> {
        NOTIFICATION_STATES
            .iter()
            .copied()
            .find(|state| state.as_str() == name)
    }

    pub fn flag(self) -> char {
        match self {
            NotificationState::Preparing => 'b',
            NotificationState::InLrms => 'q',
            NotificationState::Finishing => 'f',
            NotificationState::Finished => 'e',
            NotificationState::Deleted => 'd',
            NotificationState::Canceling => 'c',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationState::Preparing => "PREPARING",
            NotificationState::InLrms => "INLRMS",
            NotificationState::Finishing => "FINISHING",
            NotificationState::Finished => "FINISHED",
            NotificationState::Deleted => "DELETED",
            NotificationState::Canceling => "CANCELING",
        }
    }
}

/// Flags applied when a notify entry names no states.
pub const DEFAULT_NOTIFY_FLAGS: &str = "be";

/// Values accepted by the service-side `action` attribute.
pub const ACTIONS: &[&str] = &["request", "cancel", "clean", "renew", "restart"];

const NOTIFICATION_STATES: &[NotificationState] = &[
    NotificationState::Preparing,
    NotificationState::InLrms,
    NotificationState::Finishing,
    NotificationState::Finished,
    NotificationState::Deleted,
    NotificationState::Canceling,
];

const ALL_ATTRIBUTES: &[AttributeId] = &[
    AttributeId::Executable,
    AttributeId::Arguments,
    AttributeId::Stdin,
    AttributeId::Stdout,
    AttributeId::Stderr,
    AttributeId::InputFiles,
    AttributeId::Executables,
    AttributeId::Cache,
    AttributeId::OutputFiles,
    AttributeId::Queue,
    AttributeId::StartTime,
    AttributeId::LifeTime,
    AttributeId::CpuTime,
    AttributeId::WallTime,
    AttributeId::GridTime,
    AttributeId::Benchmarks,
    AttributeId::Memory,
    AttributeId::Disk,
    AttributeId::RuntimeEnvironment,
    AttributeId::Middleware,
    AttributeId::OpSys,
    AttributeId::Join,
    AttributeId::GmLog,
    AttributeId::JobName,
    AttributeId::FtpThreads,
    AttributeId::Acl,
    AttributeId::Notify,
    AttributeId::Rerun,
    AttributeId::Priority,
    AttributeId::Architecture,
    AttributeId::NodeAccess,
    AttributeId::DryRun,
    AttributeId::RslSubstitution,
    AttributeId::Environment,
    AttributeId::Count,
    AttributeId::CountPerNode,
    AttributeId::ExclusiveExecution,
    AttributeId::JobReport,
    AttributeId::CredentialServer,
    AttributeId::Action,
    AttributeId::Hostname,
    AttributeId::JobId,
    AttributeId::ClientXrsl,
    AttributeId::ClientSoftware,
    AttributeId::SaveState,
];

const UNSUPPORTED_GLOBUS_ATTRIBUTES: &[&str] = &[
    "resourcemanagercontact",
    "directory",
    "maxcputime",
    "maxwalltime",
    "maxtime",
    "maxmemory",
    "minmemory",
    "grammyjob",
    "project",
    "hostcount",
    "label",
    "subjobcommstype",
    "subjobstarttype",
    "filecleanup",
    "filestagein",
    "filestageinshared",
    "filestageout",
    "gasscache",
    "jobtype",
    "librarypath",
    "remoteiourl",
    "scratchdir",
];
