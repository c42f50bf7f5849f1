//! Provider seam
//!
//! Trait-based abstraction over the managed DNS and load balancer APIs,
//! so the orchestrator can be driven against an in-memory fake in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{LoadBalancer, RecordChange, RecordSet};

/// Continuation marker for record listing.
///
/// Mirrors the Route53 continuation triple (next record name, type, and
/// set identifier); opaque to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    pub name: String,
    pub record_type: String,
    pub identifier: Option<String>,
}

/// One page of record sets
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<RecordSet>,
    /// Continuation marker; `None` on the last page
    pub next: Option<PageToken>,
}

/// Capability interface over the managed DNS and load balancer APIs
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch one page of record sets from the zone
    async fn list_records(&self, zone_id: &str, start: Option<PageToken>) -> Result<RecordPage>;

    /// Submit a single record change against the zone
    async fn change_records(&self, zone_id: &str, change: &RecordChange) -> Result<()>;

    /// All load balancers whose name matches exactly.
    ///
    /// Implementations return every match; the exactly-one guard lives
    /// in the orchestrator.
    async fn describe_load_balancer(&self, name: &str) -> Result<Vec<LoadBalancer>>;
}
