//! Enumerator, mutator, and cleanup drivers
//!
//! Core drive logic over the `DnsProvider` seam. A rejected change
//! submission is captured per operation as a `ChangeOutcome`; listing
//! failures propagate and are fatal.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::provider::{DnsProvider, PageToken};
use crate::types::{
    ChangeAction, ChangeOutcome, LoadBalancer, RecordChange, RecordSet, RecordTarget,
    SubdomainError,
};

/// Confirmation phrase required to run cleanup with an empty filter
pub const CLEANUP_CONFIRMATION: &str = "DELETE";

/// True when operator input authorizes an unfiltered cleanup
pub fn cleanup_confirmed(input: &str) -> bool {
    input.trim() == CLEANUP_CONFIRMATION
}

/// List every record in the zone whose name contains `filter`.
///
/// Follows the provider's pagination until no further page is indicated,
/// accumulating before filtering.
pub async fn list_records(
    provider: &dyn DnsProvider,
    config: &Config,
    filter: &str,
) -> Result<Vec<RecordSet>> {
    let mut records = Vec::new();
    let mut start: Option<PageToken> = None;

    loop {
        let page = provider.list_records(&config.zone_id, start).await?;
        debug!(count = page.records.len(), "Accumulated record page");
        records.extend(page.records);

        match page.next {
            Some(token) => start = Some(token),
            None => break,
        }
    }

    records.retain(|record| record.name.contains(filter));
    Ok(records)
}

/// Resolve a load balancer name to exactly one descriptor.
///
/// Zero or multiple matches abort the operation; no change is issued.
async fn resolve_load_balancer(provider: &dyn DnsProvider, name: &str) -> Result<LoadBalancer> {
    let mut matches = provider.describe_load_balancer(name).await?;

    match matches.len() {
        0 => Err(SubdomainError::LoadBalancerNotFound(name.to_string()).into()),
        1 => Ok(matches.remove(0)),
        count => Err(SubdomainError::AmbiguousLoadBalancer {
            name: name.to_string(),
            count,
        }
        .into()),
    }
}

/// Build and submit a single record change.
///
/// The target decides the record shape: an IP becomes a plain A record
/// with the fixed TTL, a load balancer name is resolved and becomes an
/// alias record. Target resolution failures abort; a rejected submission
/// is reported in the outcome instead.
pub async fn apply_change(
    provider: &dyn DnsProvider,
    config: &Config,
    action: ChangeAction,
    subdomain: &str,
    target: &RecordTarget,
) -> Result<ChangeOutcome> {
    let name = config.qualify(subdomain);

    let (record, binding) = match target {
        RecordTarget::Ip(ip) => (RecordSet::a_record(&name, *ip), ip.to_string()),
        RecordTarget::LoadBalancer(lb_name) => {
            let lb = resolve_load_balancer(provider, lb_name).await?;
            info!(name = %lb.name, dns_name = %lb.dns_name, "Resolved load balancer");
            (RecordSet::alias_record(&name, &lb), lb.name.clone())
        }
    };

    let change = RecordChange { action, record };
    Ok(submit(provider, config, change, &binding).await)
}

/// A records that `cleanup` with this filter would delete
pub async fn cleanup_candidates(
    provider: &dyn DnsProvider,
    config: &Config,
    filter: &str,
) -> Result<Vec<RecordSet>> {
    let mut records = list_records(provider, config, filter).await?;
    records.retain(|record| record.is_a_record());
    Ok(records)
}

/// Delete every A record whose name contains `filter`, one at a time.
///
/// Each deletion is independent; a rejected deletion is reported and
/// does not block the rest.
pub async fn cleanup(
    provider: &dyn DnsProvider,
    config: &Config,
    filter: &str,
) -> Result<Vec<ChangeOutcome>> {
    let records = cleanup_candidates(provider, config, filter).await?;
    info!(count = records.len(), filter = %filter, "Cleaning up A records");

    let mut outcomes = Vec::new();
    for record in records {
        let binding = record.display_value().to_string();
        let change = RecordChange {
            action: ChangeAction::Delete,
            record,
        };
        outcomes.push(submit(provider, config, change, &binding).await);
    }

    Ok(outcomes)
}

/// Submit one change, capturing provider failure into the outcome
async fn submit(
    provider: &dyn DnsProvider,
    config: &Config,
    change: RecordChange,
    binding: &str,
) -> ChangeOutcome {
    let name = change.record.name.clone();
    let action = change.action;

    match provider.change_records(&config.zone_id, &change).await {
        Ok(()) => {
            info!(record = %name, action = %action, "Record change accepted");
            ChangeOutcome::succeeded(&name, action, binding)
        }
        Err(e) => {
            warn!(record = %name, action = %action, error = %e, "Record change rejected");
            ChangeOutcome::failed(&name, action, binding, e.to_string())
        }
    }
}
