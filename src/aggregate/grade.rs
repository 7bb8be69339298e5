//! Lead grading: map an audit profile's tally to a priority grade.

use super::{AuditProfile, SeverityTally};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority grade for a scanned site. Declared in ascending order so the
/// derived ordering gives `Skip < C < B < A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadGrade {
    Skip,
    C,
    B,
    A,
}

impl fmt::Display for LeadGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::Skip => "Skip",
        };
        write!(f, "{s}")
    }
}

impl LeadGrade {
    /// Apply the threshold rules to a severity tally. First match wins.
    pub fn from_tally(tally: &SeverityTally) -> Self {
        let impactful = tally.critical_plus_serious();
        let total = tally.total();

        if impactful >= 10 || total >= 25 {
            Self::A
        } else if impactful >= 5 || total >= 15 {
            Self::B
        } else if total >= 1 {
            Self::C
        } else {
            Self::Skip
        }
    }
}

/// Grade a sealed audit profile.
///
/// Pure and deterministic: two profiles with the same tally always grade
/// identically, whatever their other fields hold.
pub fn grade(profile: &AuditProfile) -> LeadGrade {
    LeadGrade::from_tally(&profile.tally)
}
