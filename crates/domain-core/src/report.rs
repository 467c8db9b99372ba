//! Drift report over all domains of an organization

use serde::{Deserialize, Serialize};

/// Overall reconciliation status, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Every domain matches its filesystem config
    Healthy,
    /// Some domains have no filesystem config
    Missing,
    /// Some filesystem configs differ from their domains
    Drifted,
    /// Some filesystem configs cannot be read or parsed
    Broken,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Healthy => "healthy",
            Self::Missing => "missing",
            Self::Drifted => "drifted",
            Self::Broken => "broken",
        };
        f.write_str(name)
    }
}

/// A domain that is missing, drifted or broken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// `organization/identifier`
    pub domain: String,
    pub description: String,
    /// Changed paths with old and new values, for drifted domains
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

impl DriftItem {
    pub fn new(domain: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            description: description.into(),
            changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub status: CheckStatus,
    pub drifted: Vec<DriftItem>,
    pub missing: Vec<DriftItem>,
    pub broken: Vec<DriftItem>,
    /// Filesystem configs without a domain in the store
    pub unimported: Vec<String>,
    pub messages: Vec<String>,
}

impl DriftReport {
    pub fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            drifted: Vec::new(),
            missing: Vec::new(),
            broken: Vec::new(),
            unimported: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn with_missing(item: DriftItem) -> Self {
        Self {
            status: CheckStatus::Missing,
            missing: vec![item],
            ..Self::healthy()
        }
    }

    pub fn with_drifted(item: DriftItem) -> Self {
        Self {
            status: CheckStatus::Drifted,
            drifted: vec![item],
            ..Self::healthy()
        }
    }

    pub fn with_broken(item: DriftItem) -> Self {
        Self {
            status: CheckStatus::Broken,
            messages: vec![format!("{}: {}", item.domain, item.description)],
            broken: vec![item],
            ..Self::healthy()
        }
    }

    /// Combine two reports; the status is the worse of both.
    pub fn merge(mut self, other: DriftReport) -> Self {
        self.drifted.extend(other.drifted);
        self.missing.extend(other.missing);
        self.broken.extend(other.broken);
        self.unimported.extend(other.unimported);
        self.messages.extend(other.messages);
        self.status = self.status.max(other.status);
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}

impl Default for DriftReport {
    fn default() -> Self {
        Self::healthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CheckStatus::Healthy, CheckStatus::Healthy, CheckStatus::Healthy)]
    #[case(CheckStatus::Healthy, CheckStatus::Missing, CheckStatus::Missing)]
    #[case(CheckStatus::Drifted, CheckStatus::Missing, CheckStatus::Drifted)]
    #[case(CheckStatus::Drifted, CheckStatus::Broken, CheckStatus::Broken)]
    fn merge_keeps_worst_status(
        #[case] left: CheckStatus,
        #[case] right: CheckStatus,
        #[case] expected: CheckStatus,
    ) {
        let report = |status| DriftReport {
            status,
            ..DriftReport::healthy()
        };
        assert_eq!(report(left).merge(report(right)).status, expected);
    }

    #[test]
    fn merge_combines_items() {
        let merged = DriftReport::with_missing(DriftItem::new("acme/blog", "no config"))
            .merge(DriftReport::with_drifted(DriftItem::new("acme/news", "differs")));

        assert_eq!(merged.status, CheckStatus::Drifted);
        assert_eq!(merged.missing.len(), 1);
        assert_eq!(merged.drifted.len(), 1);
    }

    #[test]
    fn broken_items_are_also_messages() {
        let report = DriftReport::with_broken(DriftItem::new("acme/blog", "invalid JSON"));
        assert_eq!(report.messages, vec!["acme/blog: invalid JSON".to_string()]);
    }
}
