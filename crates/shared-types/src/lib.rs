pub mod report;
pub mod types;

pub use report::{ComplianceReport, Diagnostic, Reminder, RuleType, Severity, Violation};
pub use types::{AlertKind, AnchorMode, CustomAlert, Day, Rules, Schedule, ScheduleRow, Tag};
