//! Route53 Subdomain Agent Library
//!
//! Manages subdomain records in one Route53 hosted zone, pointing them
//! at literal IPv4 addresses or classic ELB alias targets.

pub mod config;
pub mod orchestrator;
pub mod provider;
pub mod route53;
pub mod types;

pub use config::Config;
pub use provider::DnsProvider;
pub use route53::AwsDnsProvider;
