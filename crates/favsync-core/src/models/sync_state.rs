//! Locally persisted sync bookkeeping

use serde::{Deserialize, Serialize};

/// Record that the last sync attempt did not complete.
///
/// Cleared on a successful write, rewritten on every failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncPendingState {
    pub pending: bool,
    pub last_error: String,
    pub updated_at: String,
}

impl SyncPendingState {
    pub fn failed(message: impl Into<String>, updated_at: impl Into<String>) -> Self {
        Self {
            pending: true,
            last_error: message.into(),
            updated_at: updated_at.into(),
        }
    }
}

/// Summary of sync configuration and the last outcome, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub enabled: bool,
    pub pending: bool,
    pub last_error: String,
    pub last_sync_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_state_uses_camel_case_keys() {
        let state = SyncPendingState::failed("boom", "2024-01-01T00:00:00.000Z");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["pending"], true);
        assert_eq!(json["lastError"], "boom");
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn pending_state_tolerates_partial_records() {
        let state: SyncPendingState = serde_json::from_str("{\"pending\":true}").unwrap();
        assert!(state.pending);
        assert!(state.last_error.is_empty());
    }
}
