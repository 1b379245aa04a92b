use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dispatch::ServiceKind;

/// A resource as described by the orchestrator. Constructed per RPC,
/// immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub resource_type: String,
    /// Role varies per service: instance type, volume type, storage class,
    /// or capacity mode.
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl ResourceDescriptor {
    pub fn service_kind(&self) -> ServiceKind {
        ServiceKind::normalize(&self.resource_type)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// First present tag among `keys`, in priority order.
    pub fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.tag(key))
    }
}

/// Usage profile attached by the orchestrator. The development profile
/// scales time-based services down to 160 worker hours per month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsageProfile {
    #[default]
    Production,
    Development,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tag_respects_priority_order() {
        let mut resource = ResourceDescriptor::default();
        resource.tags.insert("volume_size".into(), "100".into());
        resource.tags.insert("size".into(), "50".into());
        assert_eq!(resource.first_tag(&["size", "volume_size"]), Some("50"));
        assert_eq!(resource.first_tag(&["missing", "volume_size"]), Some("100"));
        assert_eq!(resource.first_tag(&["missing"]), None);
    }

    #[test]
    fn usage_profile_deserializes_from_screaming_case() {
        let profile: UsageProfile = serde_json::from_str("\"DEVELOPMENT\"").unwrap();
        assert_eq!(profile, UsageProfile::Development);
    }
}
