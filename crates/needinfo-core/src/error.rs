use std::fmt;

/// Machine-readable error codes surfaced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidThresholds,
    EmptyLabel,
    SnapshotNotFound,
    SnapshotParseError,
    InvalidTimestamp,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidThresholds => "E1002",
            Self::EmptyLabel => "E1003",
            Self::SnapshotNotFound => "E2001",
            Self::SnapshotParseError => "E2002",
            Self::InvalidTimestamp => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidThresholds => "Invalid escalation thresholds",
            Self::EmptyLabel => "Needs-info label is empty",
            Self::SnapshotNotFound => "Ticket snapshot not readable",
            Self::SnapshotParseError => "Ticket snapshot parse error",
            Self::InvalidTimestamp => "Invalid timestamp",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .needinfo/config.toml and retry."),
            Self::InvalidThresholds => {
                Some("Set thresholds.warn_days strictly below thresholds.expire_days.")
            }
            Self::EmptyLabel => Some("Set labels.needs_info to the tracker's label name."),
            Self::SnapshotNotFound => Some("Check the snapshot path and read permissions."),
            Self::SnapshotParseError => {
                Some("Snapshots are JSON objects with at least a `submitter` field.")
            }
            Self::InvalidTimestamp => Some("Use RFC 3339, e.g. 2024-06-01T12:00:00Z."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<&crate::config::ConfigError> for ErrorCode {
    fn from(err: &crate::config::ConfigError) -> Self {
        match err {
            crate::config::ConfigError::InvalidThresholds { .. } => Self::InvalidThresholds,
            crate::config::ConfigError::EmptyLabel => Self::EmptyLabel,
        }
    }
}

impl From<&crate::snapshot::SnapshotError> for ErrorCode {
    fn from(err: &crate::snapshot::SnapshotError) -> Self {
        match err {
            crate::snapshot::SnapshotError::Read { .. } => Self::SnapshotNotFound,
            crate::snapshot::SnapshotError::Parse { .. } => Self::SnapshotParseError,
        }
    }
}
