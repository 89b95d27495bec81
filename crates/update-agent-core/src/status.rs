//! The published status record and its writer.

use crate::error::{AgentError, Result};
use crate::io::atomic_write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// UpgradeInfo
// ---------------------------------------------------------------------------

/// Pending package upgrades, in the order the package manager reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInfo {
    pub total: usize,
    pub security: usize,
    pub all_packages: Vec<String>,
    pub security_packages: Vec<String>,
}

impl UpgradeInfo {
    /// Build from parsed packages; counts are derived so they cannot drift
    /// from the lists.
    pub fn from_packages(all_packages: Vec<String>, security_packages: Vec<String>) -> Self {
        UpgradeInfo {
            total: all_packages.len(),
            security: security_packages.len(),
            all_packages,
            security_packages,
        }
    }
}

// ---------------------------------------------------------------------------
// RebootInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebootInfo {
    pub required: bool,
    pub packages: Vec<String>,
}

// ---------------------------------------------------------------------------
// StatusRecord
// ---------------------------------------------------------------------------

/// One check cycle's worth of results. Replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub upgrades: UpgradeInfo,
    pub reboot: RebootInfo,
    /// Last package index refresh, if any proxy file could be stat'ed.
    #[serde(with = "timestamp::optional")]
    pub last_update_check: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub agent_timestamp: DateTime<Utc>,
}

/// Published timestamps: microsecond precision with an explicit `+00:00`
/// offset, e.g. `2024-05-01T09:00:00.000000+00:00`. Consumers already parse
/// this shape, so it must not drift with chrono's default formatting.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(t: &DateTime<Utc>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    fn parse<E: serde::de::Error>(s: &str) -> Result<DateTime<Utc>, E> {
        DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(E::custom)
    }

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s)
    }

    pub mod optional {
        use super::*;

        pub fn serialize<S: Serializer>(
            t: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match t {
                Some(t) => serializer.serialize_some(&format(t)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| parse(&s))
                .transpose()
        }
    }
}

impl StatusRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Publish `record` at `path` via write-temp-then-rename.
///
/// On failure the previously published record stays in place.
pub fn write_status(path: &Path, record: &StatusRecord) -> Result<()> {
    let mut json = record.to_json()?;
    json.push('\n');
    atomic_write(path, json.as_bytes()).map_err(|e| match e {
        AgentError::Io(source) => AgentError::StatusWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    tracing::info!(
        timestamp = %timestamp::format(&record.agent_timestamp),
        "Status updated: {} updates available",
        record.upgrades.total
    );
    Ok(())
}

/// Load the currently published record.
pub fn read_status(path: &Path) -> Result<StatusRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AgentError::StatusMissing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}
