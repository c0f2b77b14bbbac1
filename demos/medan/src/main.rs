//! medan: end-to-end walk through the facility map route planner.
//!
//! Loads a school catalog (inline CSV, or the CSV/JSON file given as the
//! first argument), starts a planner session over a synthetic street grid
//! and replays a short user session: search, category filter, directions
//! from the device location, a rejected selection, and a facility-to-
//! facility route.  Every published snapshot is summarized on stdout.
//!
//! ```text
//! cargo run -p medan [-- catalog.csv|catalog.json]
//! RUST_LOG=debug cargo run -p medan
//! cargo run -p medan --features osrm -- --osrm https://router.project-osrm.org
//! ```

mod network;

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fm_catalog::{Catalog, load_catalog_csv, load_catalog_json, load_catalog_reader};
use fm_core::{Category, FacilityId, GeoPoint, PlannerConfig};
use fm_planner::{
    IconClass, MarkerTheme, PlannerBuilder, PlannerObserver, PlannerState, Session, Snapshot,
    UiEvent,
};
use fm_route::{GraphEngine, RouteEndpoint, RoutingEngine};

use network::build_network;

// ── Catalog ───────────────────────────────────────────────────────────────────

// The last two rows are malformed on purpose and are skipped with a warning.
const CATALOG_CSV: &str = "\
id,name,address,lat,lon,category\n\
s1,SD Negeri 060843,Jl. Sei Batang Hari,3.5901,98.6553,SD\n\
s2,SMA Negeri 1 Medan,Jl. Teuku Cik Ditiro,3.5829,98.6694,SMA\n\
s3,SMP Negeri 3 Medan,Jl. Pelajar,3.5703,98.6898,SMP\n\
s4,SD Swasta Harapan,Jl. Imam Bonjol,3.5850,98.6705,SD\n\
s5,SMK Negeri 2 Medan,Jl. Sei Batang Serangan,3.5995,98.6602,SMK\n\
,SD Tanpa Id,Jl. Kosong,3.59,98.66,SD\n\
s7,SMP Tanpa Lokasi,Jl. Entah,,,SMP\n\
";

/// Where the demo pretends the device is.
const DEVICE: GeoPoint = GeoPoint { lat: 3.6000, lon: 98.6700 };

fn load_catalog(arg: Option<&str>) -> Result<Catalog> {
    let Some(path) = arg else {
        return Ok(load_catalog_reader(Cursor::new(CATALOG_CSV))?);
    };
    let path = Path::new(path);
    let catalog = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            load_catalog_json(BufReader::new(file))?
        }
        Some("csv") => load_catalog_csv(path)?,
        _ => bail!("unsupported catalog file {} (expected .csv or .json)", path.display()),
    };
    Ok(catalog)
}

// ── Observer ──────────────────────────────────────────────────────────────────

struct LogObserver;

impl PlannerObserver for LogObserver {
    fn on_state_change(&mut self, from: PlannerState, to: PlannerState) {
        info!(%from, %to, "planner");
    }

    fn on_error(&mut self, error: &fm_planner::PlanError) {
        println!("  ! {error}");
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render(snap: &Snapshot, catalog: &Catalog, theme: &MarkerTheme) {
    println!(
        "[rev {:>2}] {:<18} view ({:.4}, {:.4}) z{}",
        snap.revision, snap.state, snap.viewport.center.lat, snap.viewport.center.lon, snap.viewport.zoom,
    );
    for (id, icon) in snap.presentation.visible() {
        let name = catalog.get(id).map(|f| f.name.as_str()).unwrap_or("?");
        let tag = match icon {
            IconClass::Category(c) => c.code().to_owned(),
            other => format!("{other:?}"),
        };
        println!("    {:<4} {:<22} {:<16} {}", id, name, tag, theme.icon(icon).url);
    }
    if let Some(marker) = &snap.device_marker {
        println!("    device {} {}", marker.position, theme.device_icon(marker.icon).url);
    }
    if let Some(summary) = &snap.summary {
        for line in summary.to_string().lines() {
            println!("    | {line}");
        }
    }
}

// ── Session script ────────────────────────────────────────────────────────────

async fn wait_idle(rx: &mut watch::Receiver<Snapshot>) -> Result<Snapshot> {
    let snap = tokio::time::timeout(
        Duration::from_secs(15),
        rx.wait_for(|s| s.state != PlannerState::Routing),
    )
    .await
    .context("routing did not settle")??
    .clone();
    Ok(snap)
}

async fn run_demo<E: RoutingEngine>(catalog: Catalog, engine: E) -> Result<()> {
    let config = PlannerConfig::default();
    let theme = MarkerTheme::default();

    let planner = PlannerBuilder::new(catalog, engine)
        .config(config)
        .observer(LogObserver)
        .build()?;
    let catalog = planner.catalog().clone();
    let (session, handle) = Session::new(planner);
    let task = tokio::spawn(session.run());

    let mut rx = handle.subscribe();
    render(&rx.borrow_and_update(), &catalog, &theme);

    let s = |id: &str| FacilityId::from(id);
    let script = [
        ("search \"negeri 1\"", vec![UiEvent::SearchPick(
            catalog.search("negeri 1").first().map(|f| f.id.clone()).unwrap_or_else(|| s("s2")),
        )]),
        ("search reset", vec![UiEvent::SearchReset]),
        ("only SD", vec![UiEvent::FilterCategory(Some(Category::Primary))]),
        ("all categories", vec![UiEvent::FilterCategory(None)]),
        ("directions from my location to s2", vec![
            UiEvent::DeviceLocation(Some(DEVICE)),
            UiEvent::PickOrigin(Some(RouteEndpoint::DeviceLocation)),
            UiEvent::PickDestination(Some(s("s2"))),
            UiEvent::CreateRoute,
        ]),
        ("same school twice", vec![
            UiEvent::PickOrigin(Some(RouteEndpoint::facility("s3"))),
            UiEvent::PickDestination(Some(s("s3"))),
            UiEvent::CreateRoute,
        ]),
        ("s3 to s1", vec![UiEvent::PickDestination(Some(s("s1"))), UiEvent::CreateRoute]),
        ("clear", vec![UiEvent::ClearRoute]),
    ];

    for (label, events) in script {
        println!();
        println!("== {label}");
        let target = rx.borrow().revision + events.len() as u64;
        for event in events {
            handle.send(event).await?;
        }
        rx.wait_for(|snap| snap.revision >= target).await?;
        let snap = wait_idle(&mut rx).await?;
        render(&snap, &catalog, &theme);
    }

    drop(rx);
    drop(handle);
    let planner = task.await?;
    info!(state = %planner.state(), "session finished");
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let osrm_url = args.iter().position(|a| a == "--osrm").and_then(|i| args.get(i + 1)).cloned();
    let catalog_arg = args.iter().find(|a| !a.starts_with("--") && Some(*a) != osrm_url.as_ref());

    println!("=== medan: facility map route planner ===");
    let catalog = load_catalog(catalog_arg.map(String::as_str))?;
    let counts = catalog.category_counts();
    println!(
        "Catalog: {} facilities (SD {}, SMP {}, SMA {}, other {})",
        catalog.len(), counts.primary, counts.lower_secondary, counts.upper_secondary, counts.other,
    );

    match osrm_url {
        #[cfg(feature = "osrm")]
        Some(url) => run_demo(catalog, fm_route::OsrmEngine::new(url)).await,
        #[cfg(not(feature = "osrm"))]
        Some(_) => bail!("--osrm requires building with `--features osrm`"),
        None => {
            let network = build_network();
            println!("Road network: {} nodes, {} edges", network.node_count(), network.edge_count());
            run_demo(catalog, GraphEngine::new(network)).await
        }
    }
}
