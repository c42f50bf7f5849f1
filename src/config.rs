//! Runtime configuration
//!
//! Everything an operation needs travels in an explicit `Config`; the CLI
//! fills it from flags, environment variables, or the baked-in defaults.

/// Credential profile when neither `--profile` nor `AWS_PROFILE` is set
pub const DEFAULT_PROFILE: &str = "default";

/// Region when neither `--region` nor `AWS_REGION` is set
pub const DEFAULT_REGION: &str = "us-east-1";

/// Hosted zone when neither `--zoneid` nor `ROUTE53_ZONE_ID` is set
pub const DEFAULT_ZONE_ID: &str = "Z08931172VQYGSEGTHGA";

/// Parent domain when neither `--domain` nor `PARENT_DOMAIN` is set
pub const DEFAULT_DOMAIN: &str = "lornu.ai";

/// Resolved settings for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// AWS credential profile name
    pub profile: String,
    /// AWS region
    pub region: String,
    /// Route53 hosted zone ID
    pub zone_id: String,
    /// Parent domain subdomains are qualified against
    pub domain: String,
}

impl Config {
    /// Qualify a subdomain against the parent domain.
    ///
    /// Shorthand names get the parent domain appended (`api` ->
    /// `api.lornu.ai`); names already under the parent domain pass
    /// through unchanged. Trailing dots are dropped; the provider layer
    /// works with unqualified-dot names and Route53 normalizes.
    pub fn qualify(&self, subdomain: &str) -> String {
        let name = subdomain.trim_end_matches('.');
        if name == self.domain || name.ends_with(&format!(".{}", self.domain)) {
            name.to_string()
        } else {
            format!("{}.{}", name, self.domain)
        }
    }
}
