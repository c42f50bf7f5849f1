//! Record and change types
//!
//! Shared between the CLI, the orchestrator, and the provider
//! implementations. `RecordSet` doubles as the change payload so cleanup
//! can reconstruct a deletable record verbatim from a listing.

use serde::Serialize;
use std::net::Ipv4Addr;
use thiserror::Error;

/// TTL applied to plain A records created by this tool
pub const RECORD_TTL: i64 = 60;

/// Target of a mutation, resolved from the `--ip`/`--elb` flag pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Plain A record pointing at a literal IPv4 address
    Ip(Ipv4Addr),
    /// Alias record pointing at a load balancer, looked up by name
    LoadBalancer(String),
}

impl RecordTarget {
    /// Resolve the `--ip`/`--elb` flag pair into a target.
    ///
    /// Exactly one of the two must be given. Checked before any AWS
    /// client is built, so an invalid combination never reaches the
    /// network.
    pub fn from_flags(ip: Option<Ipv4Addr>, elb: Option<String>) -> Result<Self, SubdomainError> {
        match (ip, elb) {
            (Some(_), Some(_)) => Err(SubdomainError::ConflictingTargets),
            (Some(ip), None) => Ok(RecordTarget::Ip(ip)),
            (None, Some(name)) => Ok(RecordTarget::LoadBalancer(name)),
            (None, None) => Err(SubdomainError::TargetRequired),
        }
    }
}

/// Action submitted with a record change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Upsert,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "CREATE"),
            ChangeAction::Upsert => write!(f, "UPSERT"),
            ChangeAction::Delete => write!(f, "DELETE"),
        }
    }
}

/// Alias portion of a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasTarget {
    /// DNS name of the aliased resource
    pub dns_name: String,
    /// Hosted zone the aliased resource lives in
    pub hosted_zone_id: String,
}

/// A load balancer resolved by name at mutation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancer {
    pub name: String,
    pub dns_name: String,
    pub hosted_zone_id: String,
}

/// A DNS record set, as listed from the zone or submitted as a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet {
    /// Record name in provider form (trailing dot preserved)
    pub name: String,
    /// Record type ("A", "CNAME", ...)
    pub record_type: String,
    /// TTL in seconds; absent on alias records
    pub ttl: Option<i64>,
    /// Resource values; empty on alias records
    pub values: Vec<String>,
    /// Alias target; absent on plain records
    pub alias: Option<AliasTarget>,
}

impl RecordSet {
    /// Plain A record with the fixed TTL
    pub fn a_record(name: &str, ip: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            record_type: "A".to_string(),
            ttl: Some(RECORD_TTL),
            values: vec![ip.to_string()],
            alias: None,
        }
    }

    /// Alias A record pointing at a load balancer
    pub fn alias_record(name: &str, lb: &LoadBalancer) -> Self {
        Self {
            name: name.to_string(),
            record_type: "A".to_string(),
            ttl: None,
            values: Vec::new(),
            alias: Some(AliasTarget {
                dns_name: lb.dns_name.clone(),
                hosted_zone_id: lb.hosted_zone_id.clone(),
            }),
        }
    }

    /// Record name with the trailing dot stripped, for display
    pub fn display_name(&self) -> &str {
        self.name.trim_end_matches('.')
    }

    /// First resource value, falling back to the alias DNS name
    pub fn display_value(&self) -> &str {
        self.values
            .first()
            .map(String::as_str)
            .or_else(|| self.alias.as_ref().map(|a| a.dns_name.as_str()))
            .unwrap_or("-")
    }

    pub fn is_a_record(&self) -> bool {
        self.record_type == "A"
    }
}

/// A single change request against the zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordChange {
    pub action: ChangeAction,
    pub record: RecordSet,
}

/// Per-operation report for mutations and cleanup
#[derive(Debug, Clone, Serialize)]
pub struct ChangeOutcome {
    /// Fully qualified record name
    pub name: String,
    pub action: ChangeAction,
    /// What the record was bound to (IP or load balancer name)
    pub binding: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ChangeOutcome {
    pub fn succeeded(name: &str, action: ChangeAction, binding: &str) -> Self {
        Self {
            name: name.to_string(),
            action,
            binding: binding.to_string(),
            success: true,
            error: None,
        }
    }

    pub fn failed(name: &str, action: ChangeAction, binding: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            action,
            binding: binding.to_string(),
            success: false,
            error: Some(error),
        }
    }
}

/// Errors that abort a command before or instead of a DNS change
#[derive(Debug, Error)]
pub enum SubdomainError {
    /// Neither `--ip` nor `--elb` was given
    #[error("exactly one of --ip or --elb is required")]
    TargetRequired,

    /// Both `--ip` and `--elb` were given
    #[error("--ip and --elb are mutually exclusive")]
    ConflictingTargets,

    /// Load balancer lookup matched nothing
    #[error("load balancer not found: {0}")]
    LoadBalancerNotFound(String),

    /// Load balancer lookup matched more than one candidate
    #[error("load balancer name {name} matched {count} load balancers, expected exactly one")]
    AmbiguousLoadBalancer { name: String, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_requires_exactly_one_flag() {
        let ip = Some("10.0.0.1".parse().unwrap());
        let elb = Some("web-prod".to_string());

        assert!(matches!(
            RecordTarget::from_flags(ip, elb.clone()),
            Err(SubdomainError::ConflictingTargets)
        ));
        assert!(matches!(
            RecordTarget::from_flags(None, None),
            Err(SubdomainError::TargetRequired)
        ));
        assert_eq!(
            RecordTarget::from_flags(ip, None).unwrap(),
            RecordTarget::Ip("10.0.0.1".parse().unwrap())
        );
        assert_eq!(
            RecordTarget::from_flags(None, elb).unwrap(),
            RecordTarget::LoadBalancer("web-prod".to_string())
        );
    }

    #[test]
    fn test_display_name_strips_trailing_dot() {
        let record = RecordSet::a_record("api.example.com.", "10.0.0.1".parse().unwrap());
        assert_eq!(record.display_name(), "api.example.com");
        assert_eq!(record.name, "api.example.com.");
    }

    #[test]
    fn test_display_value_falls_back_to_alias() {
        let lb = LoadBalancer {
            name: "web-prod".to_string(),
            dns_name: "web-prod-123.us-east-1.elb.amazonaws.com".to_string(),
            hosted_zone_id: "Z35SXDOTRQ7X7K".to_string(),
        };
        let record = RecordSet::alias_record("api.example.com", &lb);
        assert_eq!(
            record.display_value(),
            "web-prod-123.us-east-1.elb.amazonaws.com"
        );

        let empty = RecordSet {
            name: "ns.example.com.".to_string(),
            record_type: "NS".to_string(),
            ttl: None,
            values: Vec::new(),
            alias: None,
        };
        assert_eq!(empty.display_value(), "-");
    }

    #[test]
    fn test_change_action_display() {
        assert_eq!(ChangeAction::Create.to_string(), "CREATE");
        assert_eq!(ChangeAction::Upsert.to_string(), "UPSERT");
        assert_eq!(ChangeAction::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_change_outcome_serialization() {
        let outcome = ChangeOutcome::succeeded("api.example.com", ChangeAction::Upsert, "10.0.0.1");

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"action\":\"UPSERT\""));
        assert!(json.contains("\"success\":true"));
    }
}
