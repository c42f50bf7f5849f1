//! Route53 Subdomain Agent
//!
//! Manages subdomain records in a single Route53 hosted zone. A
//! subdomain points either at a literal IPv4 address (plain A record)
//! or at a classic ELB (alias record).
//!
//! # Usage
//! ```bash
//! # List records containing "api"
//! route53-subdomain list --filter api
//!
//! # Point api.<domain> at an IP
//! route53-subdomain create --subdomain api --ip 10.0.0.8
//!
//! # Point www.<domain> at a load balancer
//! route53-subdomain update --subdomain www --elb web-prod
//!
//! # Remove every A record containing "preview"
//! route53-subdomain cleanup --filter preview
//! ```

use std::io::{self, BufRead, Write};
use std::net::Ipv4Addr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use route53_subdomain::config::{
    Config, DEFAULT_DOMAIN, DEFAULT_PROFILE, DEFAULT_REGION, DEFAULT_ZONE_ID,
};
use route53_subdomain::orchestrator;
use route53_subdomain::route53::AwsDnsProvider;
use route53_subdomain::types::{ChangeAction, ChangeOutcome, RecordTarget};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser)]
#[command(name = "route53-subdomain")]
#[command(about = "Lornu AI Route53 subdomain agent", long_about = None)]
#[command(version)]
struct Cli {
    /// AWS credential profile
    #[arg(long, env = "AWS_PROFILE", default_value = DEFAULT_PROFILE, global = true)]
    profile: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION, global = true)]
    region: String,

    /// Route53 hosted zone ID
    #[arg(long = "zoneid", env = "ROUTE53_ZONE_ID", default_value = DEFAULT_ZONE_ID, global = true)]
    zone_id: String,

    /// Parent domain subdomains are qualified against
    #[arg(long, env = "PARENT_DOMAIN", default_value = DEFAULT_DOMAIN, global = true)]
    domain: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records in the hosted zone
    List {
        /// Only show records whose name contains this text
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// Create a subdomain record
    Create {
        /// Subdomain to create (shorthand or fully qualified)
        #[arg(long)]
        subdomain: String,

        /// IPv4 address for a plain A record
        #[arg(long)]
        ip: Option<Ipv4Addr>,

        /// Load balancer name for an alias record
        #[arg(long)]
        elb: Option<String>,
    },

    /// Update a subdomain record (create-or-update)
    Update {
        /// Subdomain to update (shorthand or fully qualified)
        #[arg(long)]
        subdomain: String,

        /// IPv4 address for a plain A record
        #[arg(long)]
        ip: Option<Ipv4Addr>,

        /// Load balancer name for an alias record
        #[arg(long)]
        elb: Option<String>,
    },

    /// Delete a subdomain record
    Delete {
        /// Subdomain to delete (shorthand or fully qualified)
        #[arg(long)]
        subdomain: String,

        /// IPv4 address the record currently holds
        #[arg(long)]
        ip: Option<Ipv4Addr>,

        /// Load balancer name the record currently aliases
        #[arg(long)]
        elb: Option<String>,
    },

    /// Delete every A record matching a filter
    Cleanup {
        /// Only delete records whose name contains this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Show what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config {
        profile: cli.profile,
        region: cli.region,
        zone_id: cli.zone_id,
        domain: cli.domain,
    };

    info!(
        zone_id = %config.zone_id,
        region = %config.region,
        domain = %config.domain,
        "Route53 subdomain agent starting"
    );

    match cli.command {
        Commands::List { filter } => {
            let provider = AwsDnsProvider::new(&config).await;
            let records = orchestrator::list_records(&provider, &config, &filter).await?;

            for record in &records {
                println!("{} {}", record.display_name(), record.display_value());
            }
            println!("{} records", records.len());
        }

        Commands::Create { subdomain, ip, elb } => {
            run_change(&config, ChangeAction::Create, &subdomain, ip, elb).await?;
        }

        Commands::Update { subdomain, ip, elb } => {
            run_change(&config, ChangeAction::Upsert, &subdomain, ip, elb).await?;
        }

        Commands::Delete { subdomain, ip, elb } => {
            run_change(&config, ChangeAction::Delete, &subdomain, ip, elb).await?;
        }

        Commands::Cleanup { filter, dry_run } => {
            if !dry_run && filter.is_empty() && !confirm_full_cleanup()? {
                println!("Cleanup aborted");
                return Ok(());
            }

            let provider = AwsDnsProvider::new(&config).await;

            if dry_run {
                let candidates =
                    orchestrator::cleanup_candidates(&provider, &config, &filter).await?;
                for record in &candidates {
                    println!("would delete {} {}", record.display_name(), record.display_value());
                }
                println!("{} records", candidates.len());
                return Ok(());
            }

            let outcomes = orchestrator::cleanup(&provider, &config, &filter).await?;

            let mut deleted = 0;
            let mut failed = 0;
            for outcome in &outcomes {
                print_outcome(outcome);
                if outcome.success {
                    deleted += 1;
                } else {
                    failed += 1;
                }
            }
            println!("{} deleted, {} failed", deleted, failed);
        }
    }

    Ok(())
}

/// Validate the target flags, then build and submit one change.
///
/// The flag check runs before any AWS client exists, so a bad
/// combination never reaches the network.
async fn run_change(
    config: &Config,
    action: ChangeAction,
    subdomain: &str,
    ip: Option<Ipv4Addr>,
    elb: Option<String>,
) -> Result<()> {
    let target = RecordTarget::from_flags(ip, elb)?;

    let provider = AwsDnsProvider::new(config).await;
    let outcome = orchestrator::apply_change(&provider, config, action, subdomain, &target).await?;
    print_outcome(&outcome);

    Ok(())
}

fn print_outcome(outcome: &ChangeOutcome) {
    if outcome.success {
        println!("✅ {} {} -> {}", outcome.action, outcome.name, outcome.binding);
    } else {
        let error = outcome.error.as_deref().unwrap_or("unknown error");
        println!("❌ {} {} failed: {}", outcome.action, outcome.name, error);
    }
}

/// Prompt for the literal confirmation phrase before a full-zone cleanup
fn confirm_full_cleanup() -> Result<bool> {
    println!("⚠️  Empty filter deletes every A record in the zone.");
    print!("Type {} to continue: ", orchestrator::CLEANUP_CONFIRMATION);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(orchestrator::cleanup_confirmed(&input))
}
