//! Map poster command line.
//!
//! Drives one render end to end: resolves the location, fetches map
//! features for the area, composes the themed poster, and writes the PNG
//! to disk. The center is given either as coordinates (`--lat/--lon`) or
//! as a place (`--city/--country`); the other half is resolved through
//! the lookup service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use poster_common::{GeoPoint, ThemeStore};
use poster_engine::{Location, NominatimLookup, PosterEngine, PosterRequest};
use poster_osm::OverpassClient;

#[derive(Parser, Debug)]
#[command(name = "poster-cli")]
#[command(about = "Render a stylized street-map poster around a point")]
struct Args {
    /// Center latitude in degrees (with --lon)
    #[arg(long)]
    lat: Option<f64>,

    /// Center longitude in degrees (with --lat)
    #[arg(long)]
    lon: Option<f64>,

    /// City name (with --country, used when no coordinates are given)
    #[arg(long)]
    city: Option<String>,

    /// Country name (with --city)
    #[arg(long)]
    country: Option<String>,

    /// Coverage radius around the center, in meters
    #[arg(long, default_value = "8000")]
    radius: f64,

    /// Theme name, resolved against the themes directory
    #[arg(long, default_value = "noir")]
    theme: String,

    /// Output width in pixels
    #[arg(long, default_value = "3000")]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value = "4000")]
    height: u32,

    /// Directory of theme records (one JSON file per theme)
    #[arg(long, default_value = "themes")]
    themes_dir: PathBuf,

    /// Contact email, forwarded to the lookup service as attribution
    #[arg(long, env = "POSTER_CONTACT")]
    email: String,

    /// Output file path
    #[arg(long, default_value = "poster.png")]
    out: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).with_target(true).init();

    let location = match (args.lat, args.lon, &args.city, &args.country) {
        (Some(lat), Some(lon), _, _) => Location::Center(GeoPoint::new(lat, lon)?),
        (None, None, Some(city), Some(country)) => Location::Place {
            city: city.clone(),
            country: country.clone(),
        },
        _ => anyhow::bail!("provide either --lat and --lon, or --city and --country"),
    };

    let themes = ThemeStore::load_dir(&args.themes_dir)
        .with_context(|| format!("loading themes from {}", args.themes_dir.display()))?;
    let overpass = OverpassClient::new().context("building acquisition client")?;
    let lookup = NominatimLookup::new(&args.email).context("building lookup client")?;
    let engine = PosterEngine::new(themes, overpass, Arc::new(lookup));

    let known = engine.theme_names();
    if !known.iter().any(|name| *name == args.theme) {
        anyhow::bail!(
            "unknown theme {:?}, available: {}",
            args.theme,
            known.join(", ")
        );
    }

    let mut request = PosterRequest::new(location, args.theme.clone(), args.email.clone());
    request.radius_m = args.radius;
    request.width = args.width;
    request.height = args.height;

    info!(theme = %args.theme, radius_m = args.radius, "rendering poster");
    let poster = engine.generate(&request).await?;

    std::fs::write(&args.out, &poster.png)
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!(
        title = %poster.title,
        bytes = poster.png.len(),
        "poster written"
    );
    println!("{}", args.out.display());

    Ok(())
}
