//! AWS provider implementation
//!
//! Wraps the Route53 and classic ELB clients behind the `DnsProvider`
//! seam. Both clients are built from one SDK config load (profile and
//! region from `Config`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_route53::types::{
    Change, ChangeAction as R53ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet,
    RrType,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::provider::{DnsProvider, PageToken, RecordPage};
use crate::types::{AliasTarget, ChangeAction, LoadBalancer, RecordChange, RecordSet};

/// Route53 + ELB client pair for one zone's worth of operations
pub struct AwsDnsProvider {
    route53: aws_sdk_route53::Client,
    elb: aws_sdk_elasticloadbalancing::Client,
}

impl AwsDnsProvider {
    /// Load AWS configuration and build both service clients.
    ///
    /// Credentials come from the profile chain; region and profile come
    /// from the resolved `Config`.
    pub async fn new(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self {
            route53: aws_sdk_route53::Client::new(&sdk_config),
            elb: aws_sdk_elasticloadbalancing::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl DnsProvider for AwsDnsProvider {
    async fn list_records(&self, zone_id: &str, start: Option<PageToken>) -> Result<RecordPage> {
        let mut request = self
            .route53
            .list_resource_record_sets()
            .hosted_zone_id(zone_id);

        if let Some(token) = start {
            request = request
                .start_record_name(token.name)
                .start_record_type(RrType::from(token.record_type.as_str()))
                .set_start_record_identifier(token.identifier);
        }

        let response = request
            .send()
            .await
            .context("Failed to list record sets")?;

        let records: Vec<RecordSet> = response
            .resource_record_sets()
            .iter()
            .map(from_resource_record_set)
            .collect();

        let next = if response.is_truncated() {
            response
                .next_record_name()
                .zip(response.next_record_type())
                .map(|(name, record_type)| PageToken {
                    name: name.to_string(),
                    record_type: record_type.as_str().to_string(),
                    identifier: response.next_record_identifier().map(str::to_string),
                })
        } else {
            None
        };

        debug!(count = records.len(), truncated = next.is_some(), "Fetched record page");

        Ok(RecordPage { records, next })
    }

    async fn change_records(&self, zone_id: &str, change: &RecordChange) -> Result<()> {
        let batch = ChangeBatch::builder()
            .changes(
                Change::builder()
                    .action(to_change_action(change.action))
                    .resource_record_set(to_resource_record_set(&change.record)?)
                    .build()
                    .context("Invalid change")?,
            )
            .build()
            .context("Invalid change batch")?;

        self.route53
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .context("Failed to submit record change")?;

        Ok(())
    }

    async fn describe_load_balancer(&self, name: &str) -> Result<Vec<LoadBalancer>> {
        let mut matches = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut request = self.elb.describe_load_balancers();
            if let Some(m) = &marker {
                request = request.marker(m);
            }

            let response = request
                .send()
                .await
                .context("Failed to describe load balancers")?;

            for description in response.load_balancer_descriptions() {
                if description.load_balancer_name() != Some(name) {
                    continue;
                }

                let (Some(dns_name), Some(hosted_zone_id)) = (
                    description.dns_name(),
                    description.canonical_hosted_zone_name_id(),
                ) else {
                    warn!(name = %name, "Load balancer missing DNS name or canonical zone");
                    continue;
                };

                matches.push(LoadBalancer {
                    name: name.to_string(),
                    dns_name: dns_name.to_string(),
                    hosted_zone_id: hosted_zone_id.to_string(),
                });
            }

            marker = response
                .next_marker()
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            if marker.is_none() {
                break;
            }
        }

        Ok(matches)
    }
}

fn to_change_action(action: ChangeAction) -> R53ChangeAction {
    match action {
        ChangeAction::Create => R53ChangeAction::Create,
        ChangeAction::Upsert => R53ChangeAction::Upsert,
        ChangeAction::Delete => R53ChangeAction::Delete,
    }
}

/// Map a crate record set onto the wire type.
///
/// Alias records always submit with health evaluation disabled.
fn to_resource_record_set(record: &RecordSet) -> Result<ResourceRecordSet> {
    let mut builder = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(RrType::from(record.record_type.as_str()))
        .set_ttl(record.ttl);

    for value in &record.values {
        builder = builder.resource_records(
            ResourceRecord::builder()
                .value(value)
                .build()
                .context("Invalid resource value")?,
        );
    }

    if let Some(alias) = &record.alias {
        builder = builder.alias_target(
            aws_sdk_route53::types::AliasTarget::builder()
                .hosted_zone_id(&alias.hosted_zone_id)
                .dns_name(&alias.dns_name)
                .evaluate_target_health(false)
                .build()
                .context("Invalid alias target")?,
        );
    }

    builder.build().context("Invalid record set")
}

fn from_resource_record_set(record: &ResourceRecordSet) -> RecordSet {
    RecordSet {
        name: record.name().to_string(),
        record_type: record.r#type().as_str().to_string(),
        ttl: record.ttl(),
        values: record
            .resource_records()
            .iter()
            .map(|r| r.value().to_string())
            .collect(),
        alias: record.alias_target().map(|alias| AliasTarget {
            dns_name: alias.dns_name().to_string(),
            hosted_zone_id: alias.hosted_zone_id().to_string(),
        }),
    }
}
