//! Recoverable per-record diagnostics raised while building the backlog.

use serde::{Deserialize, Serialize};

pub const FINDING_CLASS_DUPLICATE: &str = "backlog.duplicate";
pub const FINDING_CLASS_POINTS_UNPARSEABLE: &str = "backlog.points.unparseable";
pub const FINDING_CLASS_DATE_UNPARSEABLE: &str = "backlog.date.unparseable";
pub const FINDING_CLASS_KEY_MISSING: &str = "backlog.key.missing";
pub const FINDING_CLASS_PARENT_CYCLE: &str = "backlog.parent.cycle";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BacklogFinding {
    pub line: u64,
    pub issue_id: String,
    pub class: String,
    pub message: String,
}

impl BacklogFinding {
    pub fn new(line: u64, issue_id: &str, class: &str, message: impl Into<String>) -> Self {
        Self {
            line,
            issue_id: issue_id.to_string(),
            class: class.to_string(),
            message: message.into(),
        }
    }

    /// Emit this finding through the log facade.
    pub(crate) fn log(&self) {
        log::warn!(
            "line {}: {} {} ({})",
            self.line,
            self.issue_id,
            self.class,
            self.message
        );
    }
}
