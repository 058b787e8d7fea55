use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use waymark::{AStarError, GeoGraph, KDTree, SearchOptions};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] waymark::osm::Error);

#[derive(Parser)]
#[command(about = "Print driving directions between two points of an OSM extract")]
struct Cli {
    /// The path to the OSM file (.osm, .osm.gz or .osm.bz2)
    osm_file: PathBuf,

    /// Longitude of the start point
    #[arg(allow_hyphen_values = true)]
    start_lon: f64,

    /// Latitude of the start point
    #[arg(allow_hyphen_values = true)]
    start_lat: f64,

    /// Longitude of the destination
    #[arg(allow_hyphen_values = true)]
    dest_lon: f64,

    /// Latitude of the destination
    #[arg(allow_hyphen_values = true)]
    dest_lat: f64,

    /// Maximum number of vertices expanded by the search
    #[arg(long, default_value_t = waymark::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Resolve positions by scanning all vertices instead of building a k-d tree
    #[arg(long)]
    linear_scan: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let g = load_graph(&cli.osm_file)?;
    let options = SearchOptions {
        step_limit: cli.step_limit,
        ..Default::default()
    };

    let route = if cli.linear_scan {
        find_route(&g, &g, &cli, &options)?
    } else {
        let tree = KDTree::build(&g);
        find_route(&g, &tree, &cli, &options)?
    };

    if route.is_empty() {
        println!("no route available");
        return Ok(());
    }

    log::info!(
        "route has {} vertices, {:.3} miles",
        route.len(),
        waymark::route_distance(&g, &route)?
    );

    for direction in waymark::route_directions(&g, &route)? {
        println!("{}", direction);
    }

    Ok(())
}

fn find_route<I: waymark::NearestVertex + ?Sized>(
    g: &GeoGraph,
    index: &I,
    cli: &Cli,
    options: &SearchOptions<'_>,
) -> Result<Vec<i64>, AStarError> {
    waymark::shortest_path_with(
        g,
        index,
        cli.start_lon,
        cli.start_lat,
        cli.dest_lon,
        cli.dest_lat,
        options,
    )
}

fn load_graph<P: AsRef<Path>>(path: P) -> Result<GeoGraph, GraphLoadError> {
    let mut g = GeoGraph::new();
    let options = waymark::osm::Options::default();
    match waymark::osm::load_from_file(&mut g, &options, path.as_ref()) {
        Ok(_) => Ok(g),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
