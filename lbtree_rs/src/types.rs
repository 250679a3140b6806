use std::fmt;

use serde::Deserialize;

/// Placeholder recorded when the API omits a status field.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Which parts of the hierarchy are fetched and shown.
///
/// Built from the `--filter` / `--collapse` flags; every combination is valid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DisplayMode {
    /// Everything, unmodified.
    #[default]
    Normal,
    /// Only unhealthy members and the pools/load balancers holding them.
    Filter,
    /// Pool names only; members are never requested.
    Collapse,
    /// Load balancers whose own operating status is not ONLINE, pools by name.
    FilterCollapse,
}

impl DisplayMode {
    pub fn from_flags(filter: bool, collapse: bool) -> Self {
        match (filter, collapse) {
            (false, false) => Self::Normal,
            (true, false) => Self::Filter,
            (false, true) => Self::Collapse,
            (true, true) => Self::FilterCollapse,
        }
    }

    pub fn is_collapse(self) -> bool {
        matches!(self, Self::Collapse | Self::FilterCollapse)
    }

    /// Member listing is skipped entirely in both collapse variants.
    pub fn fetches_members(self) -> bool {
        !self.is_collapse()
    }
}

// ============================================================================
// Status enums
// ============================================================================

/// Control-plane state of a member.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProvisioningStatus {
    Active,
    PendingCreate,
    PendingUpdate,
    PendingDelete,
    Deleted,
    Error,
    Other(String),
}

impl ProvisioningStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ACTIVE") => Self::Active,
            Some("PENDING_CREATE") => Self::PendingCreate,
            Some("PENDING_UPDATE") => Self::PendingUpdate,
            Some("PENDING_DELETE") => Self::PendingDelete,
            Some("DELETED") => Self::Deleted,
            Some("ERROR") => Self::Error,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(UNKNOWN_STATUS.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::PendingCreate => "PENDING_CREATE",
            Self::PendingUpdate => "PENDING_UPDATE",
            Self::PendingDelete => "PENDING_DELETE",
            Self::Deleted => "DELETED",
            Self::Error => "ERROR",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-plane health of a member or load balancer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OperatingStatus {
    Online,
    Offline,
    Degraded,
    Error,
    NoMonitor,
    Draining,
    Other(String),
}

impl OperatingStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ONLINE") => Self::Online,
            Some("OFFLINE") => Self::Offline,
            Some("DEGRADED") => Self::Degraded,
            Some("ERROR") => Self::Error,
            Some("NO_MONITOR") => Self::NoMonitor,
            Some("DRAINING") => Self::Draining,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(UNKNOWN_STATUS.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::Degraded => "DEGRADED",
            Self::Error => "ERROR",
            Self::NoMonitor => "NO_MONITOR",
            Self::Draining => "DRAINING",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

/// Result of asking the cloud for a node's children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Fetch<T> {
    Loaded(Vec<T>),
    /// Node-local failure, rendered inline.
    Failed(String),
    /// Not requested in the active display mode.
    Skipped,
}

impl<T> Fetch<T> {
    pub fn loaded(&self) -> Option<&[T]> {
        match self {
            Fetch::Loaded(items) => Some(items),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub operating_status: OperatingStatus,
    pub pools: Fetch<Pool>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pool {
    pub id: String,
    pub name: String,
    pub members: Fetch<Member>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
}

impl Member {
    /// ACTIVE and ONLINE; anything else (including unknown values) is unhealthy.
    pub fn is_healthy(&self) -> bool {
        self.provisioning_status.is_healthy() && self.operating_status.is_healthy()
    }
}

/// Picks the `name` when the API returned a non-empty one, the id otherwise.
pub fn display_name(name: Option<&str>, id: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => id.to_string(),
    }
}
