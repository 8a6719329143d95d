//! Visual categories of diagram nodes.
//!
//! The set is closed: every node is drawn as one of the [`NodeCategory`]
//! variants. Names coming from text are resolved through [`FromStr`], which
//! rejects anything outside the set with [`UnsupportedCategory`].

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Error returned when a category name is not part of the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported node category `{name}`")]
pub struct UnsupportedCategory {
    name: String,
}

impl UnsupportedCategory {
    /// The rejected category name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Plain box
    Generic,
    /// Load balancer or reverse proxy (HAProxy)
    LoadBalancer,
    /// Disk, volume or bucket
    Storage,
    /// Time-series database (Prometheus)
    TimeSeriesDb,
    /// Log store (Loki)
    Logging,
    /// Mobile or external client
    MobileClient,
    /// Label-only placeholder (virtual IPs, daemons without an icon)
    Blank,
    /// Application service (OTel aggregator, Thanos components)
    Service,
    /// Dashboarding frontend (Grafana)
    Dashboard,
}

impl NodeCategory {
    /// Every supported category, in declaration order.
    pub const ALL: [NodeCategory; 9] = [
        Self::Generic,
        Self::LoadBalancer,
        Self::Storage,
        Self::TimeSeriesDb,
        Self::Logging,
        Self::MobileClient,
        Self::Blank,
        Self::Service,
        Self::Dashboard,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::LoadBalancer => "load_balancer",
            Self::Storage => "storage",
            Self::TimeSeriesDb => "time_series_db",
            Self::Logging => "logging",
            Self::MobileClient => "mobile_client",
            Self::Blank => "blank",
            Self::Service => "service",
            Self::Dashboard => "dashboard",
        }
    }
}

impl FromStr for NodeCategory {
    type Err = UnsupportedCategory;

    /// Accepts the canonical names and the product names used in the
    /// deployment diagrams (`haproxy`, `prometheus`, `loki`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(Self::Generic),
            "load_balancer" | "haproxy" => Ok(Self::LoadBalancer),
            "storage" => Ok(Self::Storage),
            "time_series_db" | "prometheus" => Ok(Self::TimeSeriesDb),
            "logging" | "loki" => Ok(Self::Logging),
            "mobile_client" | "mobile" => Ok(Self::MobileClient),
            "blank" => Ok(Self::Blank),
            "service" | "fastapi" => Ok(Self::Service),
            "dashboard" | "grafana" => Ok(Self::Dashboard),
            _ => Err(UnsupportedCategory {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
