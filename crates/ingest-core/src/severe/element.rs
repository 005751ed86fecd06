use serde::{Deserialize, Serialize};

use ingest_state::FileId;

use super::Severity;

/// A named, severity-classified condition.
///
/// Values handed out by a catalog are owned copies; setting the subject on one
/// never touches the catalog entry it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevereElement {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    /// File that triggered this instance of the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<FileId>,
}

impl SevereElement {
    pub(crate) fn new(name: &str, severity: Severity, description: &str) -> Self {
        Self {
            name: name.to_string(),
            severity,
            description: description.to_string(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: FileId) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Comma-joined names, as stored in the per-file summary columns.
pub fn elems_as_string(elems: &[SevereElement]) -> String {
    elems
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Highest-impact severity among `elems`, if any.
pub fn worst_severity(elems: &[SevereElement]) -> Option<Severity> {
    elems.iter().map(|e| e.severity).max()
}
