use std::io::{self, Write};
use std::path::PathBuf;

use catalog::{CatalogSnapshot, Gazetteer, GazetteerOutcome, region_groups};
use clap::{Parser, Subcommand};
use foundation::math::LatLng;
use foundation::viewport::ViewportSize;
use mapview::{Collaborators, EngineConfig, MapView};
use runtime::SystemClock;
use scene::{BridgeSurface, Color};
use services::{
    BoundarySource, CounterService, FileBoundarySource, HttpBoundarySource, HttpCounterApi,
    HttpReverseGeocoder, ReverseGeocoder, ServiceEndpoints, UnavailableBoundarySource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Geodocument portal map engine tools")]
struct Args {
    /// Document API base URL (default: PORTAL_API_URL or http://127.0.0.1:8000/api)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a gazetteer file the way the search box does
    Search {
        query: String,

        /// Gazetteer JSON: [{"subdistrict","district","province","lat","lng"}, ...]
        #[arg(long)]
        gazetteer: PathBuf,
    },

    /// Reverse geocode one coordinate against the configured endpoint
    Geocode {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Run a headless session, highlight a province or region and print the
    /// surface commands as JSON lines
    Highlight {
        /// Province name, or region name with --region
        name: String,

        #[arg(long)]
        region: bool,

        /// Boundary GeoJSON file; without it the configured endpoint is used
        #[arg(long)]
        boundaries: Option<PathBuf>,

        /// Skip the dataset and use the circle fallback
        #[arg(long, conflicts_with = "boundaries")]
        offline: bool,

        /// Highlight color as #rrggbb
        #[arg(long, default_value = "#dc2626")]
        color: String,

        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },

    /// List the static region groups
    Regions,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = EngineConfig::from_env();
    if let Some(url) = args.api_url.as_deref() {
        let timeout_ms = config.endpoints.timeout_ms;
        config.endpoints = ServiceEndpoints::from_api_url(url);
        config.endpoints.timeout_ms = timeout_ms;
    }

    match args.command {
        Command::Search { query, gazetteer } => search(&config, &query, gazetteer)?,
        Command::Geocode { lat, lng } => geocode(&config, LatLng::new(lat, lng)).await?,
        Command::Highlight {
            name,
            region,
            boundaries,
            offline,
            color,
            width,
            height,
        } => {
            let source: Box<dyn BoundarySource> = match (boundaries, offline) {
                (_, true) => Box::new(UnavailableBoundarySource),
                (Some(path), false) => Box::new(FileBoundarySource::new(path)),
                (None, false) => Box::new(HttpBoundarySource::new(&config.endpoints)?),
            };
            let color = Color::from_hex(&color)?;
            highlight(config, source, &name, region, color, ViewportSize::new(width, height)).await?;
        }
        Command::Regions => {
            for group in region_groups() {
                println!("{}\t{}", group.name, group.provinces.join(","));
            }
        }
    }

    Ok(())
}

fn search(
    config: &EngineConfig,
    query: &str,
    path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let gazetteer: Gazetteer = formats::load_gazetteer(&path)?;
    tracing::info!(entries = gazetteer.len(), path = %path.display(), "gazetteer loaded");
    match gazetteer.search(query, config.gazetteer_options()) {
        GazetteerOutcome::TooShort => {
            eprintln!("type at least {} characters", config.search_min_chars);
        }
        GazetteerOutcome::NoMatch => println!("no matching place"),
        GazetteerOutcome::Matches(entries) => {
            for e in entries {
                println!("{}\t{:.5}\t{:.5}", e.label(), e.lat, e.lng);
            }
        }
    }
    Ok(())
}

async fn geocode(config: &EngineConfig, at: LatLng) -> Result<(), Box<dyn std::error::Error>> {
    if !config.thailand_bounds.contains(at) {
        return Err(format!("({}, {}) is outside Thailand", at.lat, at.lng).into());
    }
    let geocoder = HttpReverseGeocoder::new(&config.endpoints)?;
    let address = geocoder.reverse(at).await?;
    let zone = catalog::region_of(&address.province).map(|r| r.name());
    let out = serde_json::json!({
        "lat": at.lat,
        "lng": at.lng,
        "province": address.province,
        "district": address.district,
        "subdistrict": address.subdistrict,
        "geocode": address.geocode,
        "zone": zone,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn highlight(
    config: EngineConfig,
    boundaries: Box<dyn BoundarySource>,
    name: &str,
    region: bool,
    color: Color,
    size: ViewportSize,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Collaborators {
        geocoder: Box::new(HttpReverseGeocoder::new(&config.endpoints)?),
        counters: CounterService::new(Box::new(HttpCounterApi::new(&config.endpoints)?)),
        boundaries,
    };
    let stdout = io::stdout();
    let surface = BridgeSurface::new(stdout.lock(), size, config.country_view);
    let mut view = MapView::new(
        config,
        SystemClock::new(),
        surface,
        CatalogSnapshot::default(),
        Gazetteer::default(),
        services,
    );
    view.mount().await;

    let selection = if region {
        view.select_region(name, color).cloned()
    } else {
        view.select_province(name, color).cloned()
    };
    let degraded = view.boundaries().is_some_and(|b| b.is_degraded());
    let mut out = view.into_surface().finish()?;
    out.flush()?;

    match selection {
        Some(s) => eprintln!(
            "highlighted {} ({} shapes, zoom {:.2}){}",
            s.members.join(", "),
            s.shapes.len(),
            s.view.zoom,
            if degraded { " using the circle fallback" } else { "" }
        ),
        None => return Err(format!("no boundary matches {name:?}").into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_line_definition_is_consistent() {
        Args::command().debug_assert();
        let names: Vec<String> = Args::command()
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .collect();
        assert_eq!(names, ["search", "geocode", "highlight", "regions"]);
    }

    #[test]
    fn highlight_parses_region_and_offline() {
        let args = Args::try_parse_from(["portal", "highlight", "ภาคใต้", "--region", "--offline"])
            .expect("parse");
        match args.command {
            Command::Highlight {
                name,
                region,
                offline,
                boundaries,
                ..
            } => {
                assert_eq!(name, "ภาคใต้");
                assert!(region && offline);
                assert!(boundaries.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn offline_conflicts_with_a_boundary_file() {
        let parsed = Args::try_parse_from([
            "portal",
            "highlight",
            "ภูเก็ต",
            "--offline",
            "--boundaries",
            "provinces.geojson",
        ]);
        assert!(parsed.is_err());
    }
}
