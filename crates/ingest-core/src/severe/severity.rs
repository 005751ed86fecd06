//! Severity codes and the treatment policy each one implies.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// How the archive treats a file or package exhibiting a severe element.
///
/// Ordered by impact: `Unknown < Note < Report < Bit < Reject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Archive at bit level only (normalization is lost) and notify the owner.
    Bit,
    /// Archive fully and record; no notification.
    Note,
    /// Archive nothing from the package and notify the owner.
    Reject,
    /// Archive fully, record and notify the owner.
    Report,
    /// Placeholder before a real severity is assigned.
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Bit,
        Severity::Note,
        Severity::Reject,
        Severity::Report,
        Severity::Unknown,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Severity::Bit => "BIT",
            Severity::Note => "NOTE",
            Severity::Reject => "REJECT",
            Severity::Report => "REPORT",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// True for any of the five codes, `UNKNOWN` included.
    pub fn is_valid_code(code: &str) -> bool {
        Self::ALL.iter().any(|s| s.code() == code)
    }

    pub fn archives_package(&self) -> bool {
        !matches!(self, Severity::Reject)
    }

    pub fn notifies_owner(&self) -> bool {
        matches!(self, Severity::Bit | Severity::Reject | Severity::Report)
    }

    pub fn downgrades_to_bit(&self) -> bool {
        matches!(self, Severity::Bit)
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, Severity::Bit | Severity::Note | Severity::Report)
    }

    fn rank(&self) -> u8 {
        match self {
            Severity::Unknown => 0,
            Severity::Note => 1,
            Severity::Report => 2,
            Severity::Bit => 3,
            Severity::Reject => 4,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Severity {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sev| sev.code() == s)
            .ok_or_else(|| IngestError::InvalidSevereElement {
                field: "severity",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for sev in Severity::ALL {
            assert_eq!(sev.code().parse::<Severity>().unwrap(), sev);
        }
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert!(!Severity::is_valid_code("note"));
        assert!("note".parse::<Severity>().is_err());
        assert!(Severity::is_valid_code("UNKNOWN"));
    }

    #[test]
    fn test_policies() {
        assert!(!Severity::Reject.archives_package());
        assert!(Severity::Bit.archives_package());
        assert!(Severity::Bit.downgrades_to_bit());
        assert!(!Severity::Report.downgrades_to_bit());
        assert!(!Severity::Note.notifies_owner());
        assert!(Severity::Report.notifies_owner());
        assert!(!Severity::Reject.is_recorded());
        assert!(!Severity::Unknown.is_recorded());
    }

    #[test]
    fn test_impact_order() {
        let mut all = Severity::ALL.to_vec();
        all.sort();
        assert_eq!(
            all,
            vec![
                Severity::Unknown,
                Severity::Note,
                Severity::Report,
                Severity::Bit,
                Severity::Reject
            ]
        );
    }
}
