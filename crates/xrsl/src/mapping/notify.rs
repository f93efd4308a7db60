//! The `notify` value format: `"[flags] email [email...]"`.

use xrsl_semantics::{DEFAULT_NOTIFY_FLAGS, NotificationState};

use crate::job::Notification;

/// One parsed notify value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NotifyEntry<'a> {
    pub(super) states: Vec<NotificationState>,
    pub(super) emails: Vec<&'a str>,
}

/// Parse a notify value. The error is the reason the value was rejected.
///
/// A first token without `@` holds the state flags; when absent the
/// default flags apply.
pub(super) fn parse_notify(value: &str) -> Result<NotifyEntry<'_>, &'static str> {
    let mut tokens = value.split([' ', '\t']).filter(|token| !token.is_empty()).peekable();
    let flags = match tokens.peek() {
        None => return Err("it must contain an email address"),
        Some(first) if !first.contains('@') => {
            let flags = *first;
            tokens.next();
            if tokens.peek().is_none() {
                return Err("it must contain an email address");
            }
            flags
        }
        Some(_) => DEFAULT_NOTIFY_FLAGS,
    };
    let mut states = Vec::new();
    for flag in flags.chars() {
        let state =
            NotificationState::from_flag(flag).ok_or("it contains unknown state flags")?;
        if !states.contains(&state) {
            states.push(state);
        }
    }
    let emails = tokens
        .map(|token| {
            if token.contains('@') {
                Ok(token)
            } else {
                Err("it must only contain email addresses after state flag(s)")
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NotifyEntry { states, emails })
}

/// Render a notification as a notify value.
pub(super) fn format_notify(notification: &Notification) -> String {
    let flags: String = notification
        .states
        .iter()
        .copied()
        .map(NotificationState::flag)
        .collect();
    format!("{flags} {}", notification.email)
}
