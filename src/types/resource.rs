//! Per-resource availability record.

use serde::{Deserialize, Serialize};

/// Whether a resource was servable from a particular gateway.
///
/// The entry remembers which gateway it was checked against; callers treat
/// it as unknown once the gateway in use differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAvailabilityEntry {
    /// Logical resource identifier (name or content address).
    pub resource_key: String,
    /// Gateway host the check ran against.
    pub gateway: String,
    /// Result of the check.
    pub available: bool,
    /// When the check ran, in milliseconds since the Unix epoch.
    pub last_checked_ms: u64,
}

impl ResourceAvailabilityEntry {
    /// Whether this entry describes `gateway`.
    pub fn applies_to(&self, gateway: &str) -> bool {
        self.gateway.eq_ignore_ascii_case(gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_same_gateway_only() {
        let entry = ResourceAvailabilityEntry {
            resource_key: "mypage".into(),
            gateway: "a.example".into(),
            available: true,
            last_checked_ms: 0,
        };
        assert!(entry.applies_to("a.example"));
        assert!(entry.applies_to("A.Example"));
        assert!(!entry.applies_to("b.example"));
    }
}
