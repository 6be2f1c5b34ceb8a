//! GivingZone CLI
//!
//! Command-line interface for discovery, directions and offline
//! classification of saved Overpass responses.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use application::{DiscoverySnapshot, OrgFilter};
use clap::{Parser, Subcommand};
use domain::{GeoLocation, GivingType, OrgCategory, Organization, RouteResult};
use infrastructure::{AppConfig, build_services};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// GivingZone CLI
#[derive(Parser)]
#[command(name = "givingzone-cli")]
#[command(author, version, about = "Find places to give Zakat and Sadaqah nearby", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "GIVINGZONE_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover organizations around a position
    ///
    /// Example: givingzone-cli discover --lat 5.6037 --lon=-0.187 --giving-type zakat
    Discover {
        #[command(flatten)]
        position: Position,

        /// Search radius in meters (overrides discovery.default_radius_m)
        #[arg(short, long)]
        radius: Option<u32>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Discover around a position, then route to one organization
    ///
    /// Example: givingzone-cli route 1001 --lat 5.6037 --lon=-0.187
    Route {
        /// Organization id as listed by `discover`
        organization_id: i64,

        #[command(flatten)]
        position: Position,
    },

    /// Classify a saved Overpass JSON response without network access
    ///
    /// Example: givingzone-cli classify overpass.json --lat 5.6037 --lon=-0.187
    Classify {
        /// Path to the saved response
        file: PathBuf,

        #[command(flatten)]
        position: Position,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(clap::Args)]
struct Position {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,
}

impl Position {
    fn to_location(&self) -> anyhow::Result<GeoLocation> {
        GeoLocation::new(self.lat, self.lon).map_err(|e| anyhow::anyhow!("{e}"))
    }
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Only this category (food_support, education, health, community)
    #[arg(long)]
    category: Option<OrgCategory>,

    /// Only organizations accepting this giving type (zakat, sadaqah)
    #[arg(long)]
    giving_type: Option<GivingType>,

    /// Only organizations with rich enough contact data
    #[arg(long)]
    verified_only: bool,
}

impl FilterArgs {
    const fn to_filter(&self) -> OrgFilter {
        OrgFilter {
            category: self.category,
            giving_type: self.giving_type,
            verified_only: self.verified_only,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    AppConfig::load_from(path).context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    info!(
        environment = %config.environment,
        mirrors = config.overpass.mirrors.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Discover {
            position,
            radius,
            filter,
        } => {
            if let Some(radius) = radius {
                config.discovery.default_radius_m = radius;
            }
            let services = build_services(&config)?;
            let snapshot = services
                .coordinator
                .on_location_resolved(position.to_location()?)
                .await?;
            let organizations = services.coordinator.organizations(&filter.to_filter());

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&organizations)?);
            } else {
                println!("{}", format_header(&snapshot, organizations.len()));
                print_organizations(&organizations);
            }
        },

        Commands::Route {
            organization_id,
            position,
        } => {
            let services = build_services(&config)?;
            services
                .coordinator
                .on_location_resolved(position.to_location()?)
                .await?;
            let route = services.coordinator.directions_to(organization_id).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                println!("{}", format_route(&route));
            }
        },

        Commands::Classify {
            file,
            position,
            filter,
        } => {
            let organizations =
                classify_file(&config, &file, position.to_location()?, &filter.to_filter())
                    .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&organizations)?);
            } else {
                println!("{} organizations in {}", organizations.len(), file.display());
                print_organizations(&organizations);
            }
        },
    }

    Ok(())
}

/// Parse and classify a saved Overpass response, nearest first
async fn classify_file(
    config: &AppConfig,
    file: &Path,
    user: GeoLocation,
    filter: &OrgFilter,
) -> anyhow::Result<Vec<Organization>> {
    let body = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let elements = integration_overpass::parse_response(&body)?;
    debug!(elements = elements.len(), file = %file.display(), "Parsed saved response");
    let classifier = application::OrgClassifier::new(config.classifier.table())?;

    let mut organizations = classifier.classify_all(&elements, &user);
    organizations.retain(|org| filter.matches(org));
    Ok(organizations)
}

fn print_organizations(organizations: &[Organization]) {
    for org in organizations {
        println!("{}", format_organization(org));
    }
}

fn format_header(snapshot: &DiscoverySnapshot, shown: usize) -> String {
    format!(
        "📍 {} ({} m radius): {shown} of {} organizations",
        snapshot.area_label.as_deref().unwrap_or("Unknown area"),
        snapshot.radius_meters,
        snapshot.organizations.len(),
    )
}

fn format_organization(org: &Organization) -> String {
    let giving: Vec<String> = org.giving_types().iter().map(ToString::to_string).collect();
    let mut line = format!(
        "{:>8}  {:<32} {:<12} {:<16} [{}] #{}",
        org.distance_label(),
        org.name(),
        org.category().label(),
        giving.join(", "),
        if org.is_verified() { "verified" } else { "-" },
        org.id(),
    );
    if !org.address().is_empty() {
        line.push_str(&format!("\n          {}", org.address()));
    }
    line
}

fn format_route(route: &RouteResult) -> String {
    let mut out = format!("🧭 {} → {}", route.from, route.to);
    match route.summary {
        Some(summary) => out.push_str(&format!(
            "\n   {:.1} km, about {} min, {} points",
            summary.distance_meters / 1000.0,
            (summary.duration_seconds / 60.0).ceil() as u64,
            route.path.len(),
        )),
        None if route.has_path() => {
            out.push_str(&format!("\n   {} points", route.path.len()));
        },
        None => out.push_str("\n   No road route available, showing endpoints only"),
    }
    out
}
