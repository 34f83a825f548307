mod fixtures;

use std::env;
use std::time::{Duration, Instant};

use testcontainers::core::IntoContainerPort;
use testcontainers::runners::SyncRunner;
use testcontainers::{Container, GenericImage, ImageExt, TestcontainersError};

use fixtures::*;
use walk_planner::point::{Point, PointType};
use walk_planner::synthesizer::{PathSource, RouteSynthesizer};
use walk_planner::valhalla::{ValhallaClient, ValhallaConfig};

const DEFAULT_TILE_URL: &str = "https://download.geofabrik.de/asia/japan/kanto-latest.osm.pbf";

fn valhalla_container() -> Result<(Container<GenericImage>, String), TestcontainersError> {
    let tile_url = env::var("VALHALLA_TILE_URL").unwrap_or_else(|_| DEFAULT_TILE_URL.to_string());

    let image = GenericImage::new("ghcr.io/gis-ops/docker-valhalla/valhalla", "latest")
        .with_exposed_port(8002.tcp())
        .with_env_var("tile_urls", tile_url)
        .with_env_var("serve_tiles", "True")
        .with_env_var("build_admins", "False")
        .with_env_var("build_time_zones", "False")
        .with_startup_timeout(Duration::from_secs(60));

    let container = image.start()?;
    let port = container.get_host_port_ipv4(8002.tcp())?;
    let base_url = format!("http://127.0.0.1:{}", port);

    Ok((container, base_url))
}

#[test]
#[ignore = "needs Docker and downloads routing tiles"]
fn valhalla_routes_a_walk_through_tokyo() {
    let (container, base_url) = valhalla_container().expect("start Valhalla container");
    let client = ValhallaClient::new(ValhallaConfig {
        base_url,
        ..ValhallaConfig::default()
    })
    .expect("build Valhalla client");

    // Tile building takes a while on first start.
    let start = Instant::now();
    while !client.status() && start.elapsed() < Duration::from_secs(1800) {
        std::thread::sleep(Duration::from_secs(5));
    }
    assert!(client.status(), "Valhalla never became ready");

    let points = vec![
        Point::new(TOKYO_STATION.0, TOKYO_STATION.1, PointType::Start, 0),
        Point::new(HIBIYA_PARK.0, HIBIYA_PARK.1, PointType::Waypoint, 1),
        Point::new(TOKYO_TOWER.0, TOKYO_TOWER.1, PointType::Goal, 2),
    ];
    let synth = RouteSynthesizer::new(client, Duration::from_secs(30));
    let result = synth.synthesize(&points);

    if result.source != PathSource::Routed {
        if let Ok(stderr) = container.stderr_to_vec() {
            eprintln!("Valhalla stderr:\n{}", String::from_utf8_lossy(&stderr));
        }
    }
    assert_eq!(result.source, PathSource::Routed);
    assert!(result.path.len() > points.len());
    let summary = result.summary.expect("routed summary");
    assert!(summary.length_km > 3.0 && summary.length_km < 10.0);

    drop(container);
}
