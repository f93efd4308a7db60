use serde::{Deserialize, Serialize};
use xrsl_semantics::NotificationState;

/// The program to run and its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    pub path: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// An email address and the job states it is notified about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub email: String,
    #[serde(with = "state_names")]
    pub states: Vec<NotificationState>,
}

/// What the job runs, and how it is reported on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub executable: Executable,
    pub input: String,
    pub output: String,
    pub error: String,
    pub environment: Vec<(String, String)>,
    /// Directory the grid manager writes its own log files to.
    pub log_dir: String,
    pub remote_logging: Vec<String>,
    pub rerun: Option<u32>,
    /// Requested start time, kept exactly as written.
    pub processing_start_time: Option<String>,
    pub priority: Option<u32>,
    pub notifications: Vec<Notification>,
    pub credential_service: Vec<String>,
    /// Raw access control document.
    pub access_control: Option<String>,
    pub dry_run: bool,
}

impl Application {
    /// Add states for an address, merging with an existing entry for the
    /// same address. States already present are skipped.
    pub fn notify(&mut self, email: &str, states: &[NotificationState]) {
        let index = match self
            .notifications
            .iter()
            .position(|notification| notification.email == email)
        {
            Some(index) => index,
            None => {
                self.notifications.push(Notification {
                    email: email.to_string(),
                    states: Vec::new(),
                });
                self.notifications.len() - 1
            }
        };
        let entry = &mut self.notifications[index];
        for &state in states {
            if !entry.states.contains(&state) {
                entry.states.push(state);
            }
        }
    }
}

mod state_names {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use xrsl_semantics::NotificationState;

    pub fn serialize<S>(states: &[NotificationState], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(states.iter().copied().map(NotificationState::as_str))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NotificationState>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|name| {
                NotificationState::from_name(name)
                    .ok_or_else(|| D::Error::custom(format!("unknown job state '{name}'")))
            })
            .collect()
    }
}
