//! Health payload returned by `GET /health`.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::config::{AppConfig, Environment};

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Degraded,
    Down,
}

/// Reachability of a single downstream dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Status,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub time: String,
    pub service: String,
    pub env: Environment,
    /// Only dependencies that are actually probed are listed. Nothing is probed
    /// yet, so this stays empty and is left out of the response.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, DependencyStatus>,
}

impl HealthStatus {
    /// The process is up and answering requests.
    pub fn ok(config: &AppConfig) -> Self {
        Self {
            status: Status::Ok,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            service: config.service_name.clone(),
            env: config.environment,
            dependencies: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_ok_payload_shape() {
        let config = AppConfig {
            service_name: "oauth2".to_string(),
            environment: Environment::Test,
            ..AppConfig::default()
        };

        let json = serde_json::to_value(HealthStatus::ok(&config)).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "oauth2");
        assert_eq!(json["env"], "test");
        assert!(json.get("dependencies").is_none());
        let time = json["time"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(time).is_ok());
        assert!(time.ends_with('Z'));
    }

    #[test]
    fn test_dependencies_serialized_when_present() {
        let mut health = HealthStatus::ok(&AppConfig::default());
        health.status = Status::Degraded;
        health
            .dependencies
            .insert("database".to_string(), DependencyStatus::Down);

        let json = serde_json::to_value(&health).unwrap();

        assert_eq!(json["status"], "degraded");
        assert_eq!(json["dependencies"]["database"], "down");
    }
}
