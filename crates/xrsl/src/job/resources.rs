use serde::{Deserialize, Serialize};

use super::period::Period;
use super::software::SoftwareRequirement;

/// Optional lower and upper bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Range {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// A reference machine speed that a time limit is expressed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub value: f64,
}

/// A time limit in seconds, optionally scaled by a benchmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalableTime {
    pub range: Range,
    pub benchmark: Option<Benchmark>,
}

impl ScalableTime {
    pub fn is_set(&self) -> bool {
        self.range.max.is_some()
    }
}

/// Network connectivity the job needs on its worker node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeAccess {
    #[default]
    None,
    Inbound,
    Outbound,
    InOutbound,
}

impl NodeAccess {
    /// Add one direction of access.
    pub fn with(self, other: NodeAccess) -> NodeAccess {
        match (self, other) {
            (NodeAccess::None, access) | (access, NodeAccess::None) => access,
            (NodeAccess::Inbound, NodeAccess::Inbound) => NodeAccess::Inbound,
            (NodeAccess::Outbound, NodeAccess::Outbound) => NodeAccess::Outbound,
            _ => NodeAccess::InOutbound,
        }
    }

    pub fn inbound(self) -> bool {
        matches!(self, NodeAccess::Inbound | NodeAccess::InOutbound)
    }

    pub fn outbound(self) -> bool {
        matches!(self, NodeAccess::Outbound | NodeAccess::InOutbound)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExclusiveExecution {
    #[default]
    Default,
    True,
    False,
}

/// Slot layout of a parallel job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotRequirement {
    pub number_of_slots: Option<u32>,
    pub slots_per_host: Option<u32>,
    pub exclusive_execution: ExclusiveExecution,
}

/// What the job needs from the execution service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub operating_system: SoftwareRequirement,
    pub ce_type: SoftwareRequirement,
    pub run_time_environment: SoftwareRequirement,
    pub platform: String,
    /// Megabytes.
    pub individual_physical_memory: Option<u64>,
    /// Megabytes.
    pub disk_space: Option<u64>,
    pub session_life_time: Option<Period>,
    pub total_cpu_time: ScalableTime,
    pub individual_wall_time: ScalableTime,
    pub node_access: NodeAccess,
    pub slot_requirement: SlotRequirement,
    pub queue_name: String,
}
