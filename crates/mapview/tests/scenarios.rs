use std::sync::{Arc, Mutex};

use catalog::{
    CatalogSnapshot, Category, CounterKind, DocumentCounts, DocumentFilter, Gazetteer, GazetteerEntry,
    GazetteerOutcome, GeoDocument,
};
use formats::BoundaryCollection;
use foundation::{CategoryId, DocumentId};
use foundation::math::LatLng;
use foundation::viewport::{Viewport, ViewportSize};
use layers::{ColorSource, color_of};
use mapview::{
    Collaborators, EngineConfig, EngineEvent, LocationData, MapView, NoticeKind,
};
use pretty_assertions::assert_eq;
use runtime::ManualClock;
use scene::{Color, MapEngineAdapter, RecordingSurface, ShapeGeometry, SurfaceCommand, SurfaceEvent};
use services::{
    Address, BoundarySource, BoxFuture, CounterApi, CounterService, ReverseGeocoder, ServiceError,
    ServiceErrorKind, UnavailableBoundarySource,
};

const CHIANG_MAI: LatLng = LatLng::new(18.7883, 98.9853);
const PHUKET: LatLng = LatLng::new(7.8804, 98.3923);
const BANGKOK: LatLng = LatLng::new(13.7563, 100.5018);

const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "ภูเก็ต"},
     "geometry": {"type": "Polygon", "coordinates":
       [[[98.25, 7.75], [98.45, 7.75], [98.45, 8.15], [98.25, 8.15], [98.25, 7.75]]]}},
    {"type": "Feature", "properties": {"name": "พังงา"},
     "geometry": {"type": "Polygon", "coordinates":
       [[[98.2, 8.2], [98.8, 8.2], [98.8, 9.3], [98.2, 9.3], [98.2, 8.2]]]}},
    {"type": "Feature", "properties": {"name": "กระบี่"},
     "geometry": {"type": "Polygon", "coordinates":
       [[[98.8, 7.8], [99.3, 7.8], [99.3, 8.6], [98.8, 8.6], [98.8, 7.8]]]}},
    {"type": "Feature", "properties": {"name": "เชียงใหม่"},
     "geometry": {"type": "Polygon", "coordinates":
       [[[98.0, 17.5], [99.5, 17.5], [99.5, 20.0], [98.0, 20.0], [98.0, 17.5]]]}}
  ]
}"#;

// --- collaborators ---

struct StaticBoundaries(&'static str);

impl BoundarySource for StaticBoundaries {
    fn fetch(&self) -> BoxFuture<'_, Result<BoundaryCollection, ServiceError>> {
        Box::pin(async move {
            BoundaryCollection::from_geojson_str(self.0)
                .map_err(|e| ServiceError::decode(e.to_string()))
        })
    }
}

#[derive(Clone, Default)]
struct FakeGeocoder {
    calls: Arc<Mutex<Vec<LatLng>>>,
    failing: Arc<Mutex<bool>>,
}

impl ReverseGeocoder for FakeGeocoder {
    fn reverse(&self, at: LatLng) -> BoxFuture<'_, Result<Address, ServiceError>> {
        Box::pin(async move {
            self.calls.lock().expect("lock").push(at);
            if *self.failing.lock().expect("lock") {
                return Err(ServiceError::new(ServiceErrorKind::Timeout, "geocoder timed out"));
            }
            let province = if at.lat > 15.0 { "เชียงใหม่" } else { "ภูเก็ต" };
            Ok(Address {
                province: province.to_string(),
                district: format!("เมือง{province}"),
                subdistrict: "ตำบลทดสอบ".to_string(),
                geocode: None,
            })
        })
    }
}

#[derive(Clone, Default)]
struct FakeCounters {
    calls: Arc<Mutex<Vec<(DocumentId, CounterKind)>>>,
    remote: Arc<Mutex<Vec<(DocumentId, DocumentCounts)>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeCounters {
    fn calls(&self) -> Vec<(DocumentId, CounterKind)> {
        self.calls.lock().expect("lock").clone()
    }
}

impl CounterApi for FakeCounters {
    fn increment(&self, id: DocumentId, kind: CounterKind) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move {
            self.calls.lock().expect("lock").push((id, kind));
            if *self.failing.lock().expect("lock") {
                return Err(ServiceError::new(ServiceErrorKind::Transport, "offline"));
            }
            let mut remote = self.remote.lock().expect("lock");
            if let Some((_, c)) = remote.iter_mut().find(|(d, _)| *d == id) {
                match kind {
                    CounterKind::View => c.views += 1,
                    CounterKind::Download => c.downloads += 1,
                }
            }
            Ok(())
        })
    }

    fn fetch_counts(&self, id: DocumentId) -> BoxFuture<'_, Result<DocumentCounts, ServiceError>> {
        Box::pin(async move {
            if *self.failing.lock().expect("lock") {
                return Err(ServiceError::new(ServiceErrorKind::Transport, "offline"));
            }
            self.remote
                .lock()
                .expect("lock")
                .iter()
                .find(|(d, _)| *d == id)
                .map(|(_, c)| *c)
                .ok_or_else(|| ServiceError::new(ServiceErrorKind::Status(404), "no such document"))
        })
    }
}

// --- fixtures ---

fn doc(id: i64, category_id: i64, at: LatLng, province: &str, views: u64) -> GeoDocument {
    GeoDocument {
        id,
        title: format!("เอกสาร {id}"),
        latitude: at.lat,
        longitude: at.lng,
        category_id,
        province: province.to_string(),
        district: String::new(),
        subdistrict: String::new(),
        year: Some(2567),
        is_published: true,
        view_count: views,
        download_count: 1,
        created_at_ms: id as u64 * 1_000,
    }
}

fn catalog() -> CatalogSnapshot {
    let mut hidden = doc(4, 1, BANGKOK, "กรุงเทพมหานคร", 0);
    hidden.is_published = false;
    CatalogSnapshot::new(
        [
            doc(1, 1, CHIANG_MAI, "เชียงใหม่", 10),
            doc(2, 2, PHUKET, "ภูเก็ต", 5),
            doc(3, 3, BANGKOK, "กรุงเทพมหานคร", 0),
            hidden,
        ],
        [
            Category { id: 1, name: "ผังเมือง".into() },
            Category { id: 2, name: "ธรณีวิทยา".into() },
            Category { id: 3, name: "อุทกวิทยา".into() },
        ],
    )
}

fn gazetteer() -> Gazetteer {
    let mut entries: Vec<GazetteerEntry> = (1..=14)
        .map(|i| {
            GazetteerEntry::new(
                format!("ตำบลที่{i}"),
                "เมืองเชียงใหม่",
                "เชียงใหม่",
                LatLng::new(18.7 + i as f64 * 0.01, 98.9),
            )
        })
        .collect();
    entries.push(GazetteerEntry::new("ตลาดใหญ่", "เมืองภูเก็ต", "ภูเก็ต", PHUKET));
    entries.push(GazetteerEntry::new("สีลม", "บางรัก", "กรุงเทพมหานคร", BANGKOK));
    Gazetteer::new(entries)
}

type View = MapView<RecordingSurface<ManualClock>, ManualClock>;

struct Harness {
    clock: ManualClock,
    view: View,
    geocoder: FakeGeocoder,
    counters: FakeCounters,
}

async fn harness_with(boundaries: Box<dyn BoundarySource>) -> Harness {
    harness_over(catalog(), boundaries).await
}

async fn harness_over(catalog: CatalogSnapshot, boundaries: Box<dyn BoundarySource>) -> Harness {
    let clock = ManualClock::new();
    let config = EngineConfig::default();
    let surface = RecordingSurface::new(
        clock.clone(),
        ViewportSize::new(1280.0, 800.0),
        config.country_view,
    );
    let geocoder = FakeGeocoder::default();
    let counters = FakeCounters::default();
    counters.remote.lock().expect("lock").extend([
        (DocumentId(1), DocumentCounts { views: 41, downloads: 3 }),
        (DocumentId(2), DocumentCounts { views: 5, downloads: 1 }),
    ]);
    let services = Collaborators {
        geocoder: Box::new(geocoder.clone()),
        counters: CounterService::new(Box::new(counters.clone())),
        boundaries,
    };
    let mut view = MapView::new(config, clock.clone(), surface, catalog, gazetteer(), services);
    view.mount().await;
    view.surface_mut().take_commands();
    view.drain_events();
    Harness {
        clock,
        view,
        geocoder,
        counters,
    }
}

async fn harness() -> Harness {
    harness_with(Box::new(StaticBoundaries(BOUNDARIES))).await
}

fn visible_geometries(view: &View) -> Vec<ShapeGeometry> {
    view.surface()
        .visible_shapes()
        .map(|(_, s)| s.geometry.clone())
        .collect()
}

fn geometries_of(view: &View, name: &str) -> Vec<ShapeGeometry> {
    view.boundaries()
        .and_then(|b| b.feature(name))
        .map(|f| f.shapes())
        .unwrap_or_default()
}

const RED: Color = Color::rgb(0xdc, 0x26, 0x26);
const BLUE: Color = Color::rgb(0x25, 0x63, 0xeb);

// --- scenarios ---

#[test]
fn color_assignment_is_deterministic_for_every_id() {
    for id in [-5, -1, 0, 1, 7, 12, 13, 999, i64::MAX] {
        let id = CategoryId(id);
        assert_eq!(color_of(id), color_of(id));
    }
    assert_eq!(color_of(CategoryId(0)).source, ColorSource::Default);
    assert_eq!(color_of(CategoryId(-3)).source, ColorSource::Default);
}

#[tokio::test]
async fn mount_renders_published_markers_and_subscribes() {
    let h = harness().await;
    let markers = h.view.surface().markers();
    assert_eq!(
        markers.keys().copied().collect::<Vec<_>>(),
        vec![DocumentId(1), DocumentId(2), DocumentId(3)]
    );
    assert_eq!(h.view.surface().listeners().len(), 7);
    assert!(!h.view.boundaries().expect("store").is_degraded());
    // Hit targets are drawn but invisible.
    assert!(h.view.surface().shapes().count() >= 4);
    assert!(visible_geometries(&h.view).is_empty());
}

#[tokio::test]
async fn hover_shorter_than_the_delay_never_moves_the_camera() {
    let mut h = harness().await;
    h.view.list_enter(DocumentId(1)).expect("known");
    h.clock.advance(599);
    h.view.poll();
    h.view.list_leave();
    h.clock.advance(5_000);
    h.view.poll();

    assert!(h.view.surface().camera_commands().is_empty());
    assert_eq!(
        h.view.drain_events(),
        vec![
            EngineEvent::HoverChanged(Some(DocumentId(1))),
            EngineEvent::HoverChanged(None)
        ]
    );
}

#[tokio::test]
async fn only_the_latest_hover_moves_the_camera() {
    let mut h = harness().await;
    h.view.list_enter(DocumentId(1)).expect("known");
    h.clock.advance(400);
    h.view.list_enter(DocumentId(2)).expect("known");
    h.clock.advance(400);
    assert_eq!(h.view.poll().hover_fired, None);
    h.clock.advance(200);
    assert_eq!(h.view.poll().hover_fired, Some(DocumentId(2)));
    h.clock.advance(10_000);
    assert_eq!(h.view.poll().hover_fired, None);

    let moves = h.view.surface().camera_commands();
    assert_eq!(moves.len(), 1);
    assert_eq!(
        moves[0],
        &SurfaceCommand::FlyTo {
            viewport: Viewport::new(PHUKET, 12.0),
            duration_ms: 1000
        }
    );
    assert_eq!(h.view.metrics().counter("hover.timers_cancelled"), 1);
}

#[tokio::test]
async fn leaving_after_a_preview_returns_home_slowly() {
    let mut h = harness().await;
    let home = h.view.hover().home().expect("home captured");
    h.view.list_enter(DocumentId(1)).expect("known");
    h.clock.advance(600);
    h.view.poll();
    h.view.list_leave();

    let last = h.view.surface().camera_commands().last().copied().cloned();
    assert_eq!(
        last,
        Some(SurfaceCommand::FlyTo {
            viewport: home,
            duration_ms: 1500
        })
    );
}

#[tokio::test]
async fn list_click_moves_immediately_and_cancels_the_hover() {
    let mut h = harness().await;
    h.view.list_enter(DocumentId(1)).expect("known");
    h.view.list_click(DocumentId(2)).expect("known");
    assert_eq!(h.view.surface().camera_commands().len(), 1);
    assert_eq!(h.view.surface().camera_target().center, PHUKET);

    h.clock.advance(1_000);
    assert_eq!(h.view.poll().hover_fired, None);
    assert_eq!(h.view.surface().camera_commands().len(), 1);
}

#[tokio::test]
async fn marker_hover_is_reported_instantly_without_camera_motion() {
    let mut h = harness().await;
    h.view
        .handle_event(SurfaceEvent::MarkerHover { id: DocumentId(3) })
        .await
        .expect("ok");
    assert_eq!(h.view.drain_events(), vec![EngineEvent::HoverChanged(Some(DocumentId(3)))]);
    assert!(!h.view.hover().is_pending());
    assert!(h.view.surface().markers()[&DocumentId(3)].highlighted);

    h.view
        .handle_event(SurfaceEvent::MarkerOut { id: DocumentId(3) })
        .await
        .expect("ok");
    assert_eq!(h.view.drain_events(), vec![EngineEvent::HoverChanged(None)]);
    assert!(h.view.surface().camera_commands().is_empty());
}

#[tokio::test]
async fn region_selection_draws_exactly_its_members_and_close_resets() {
    let mut h = harness().await;
    let selection = h
        .view
        .select_region_members("อันดามัน", &["ภูเก็ต", "พังงา", "ไม่มีจังหวัดนี้"], RED)
        .expect("selected")
        .clone();
    assert_eq!(selection.members, vec!["ภูเก็ต".to_string(), "พังงา".to_string()]);
    assert!(selection.view.zoom <= 8.0);

    let mut expected = geometries_of(&h.view, "ภูเก็ต");
    expected.extend(geometries_of(&h.view, "พังงา"));
    assert_eq!(visible_geometries(&h.view), expected);

    assert!(h.view.close_highlight());
    assert!(visible_geometries(&h.view).is_empty());
    h.clock.advance(2_000);
    assert_eq!(h.view.surface().camera(), h.view.config().country_view);
    assert!(!h.view.close_highlight());
}

#[tokio::test]
async fn static_region_selection_resolves_loaded_members() {
    let mut h = harness().await;
    let selection = h.view.select_region("ภาคใต้", BLUE).expect("selected").clone();
    // Only three southern provinces are in the dataset.
    let mut members = selection.members.clone();
    members.sort();
    let mut expected = vec!["กระบี่".to_string(), "พังงา".to_string(), "ภูเก็ต".to_string()];
    expected.sort();
    assert_eq!(members, expected);
    assert!(h.view.select_region("ภาคไม่มี", BLUE).is_none());
}

#[tokio::test]
async fn second_province_replaces_the_first_completely() {
    let mut h = harness().await;
    let first = h.view.select_province("ภูเก็ต", RED).expect("phuket").clone();
    assert!(first.view.zoom <= 10.0);
    let phuket = geometries_of(&h.view, "ภูเก็ต");
    assert_eq!(visible_geometries(&h.view), phuket);

    h.view.select_province("เชียงใหม่", BLUE).expect("chiang mai");
    let visible = visible_geometries(&h.view);
    assert_eq!(visible, geometries_of(&h.view, "เชียงใหม่"));
    assert!(visible.iter().all(|g| !phuket.contains(g)));

    // Selected shapes always sit above the passive style.
    assert!(h.view.surface().visible_shapes().all(|(_, s)| s.style.stroke == BLUE));
}

#[tokio::test]
async fn unknown_province_leaves_the_selection_alone() {
    let mut h = harness().await;
    h.view.select_province("ภูเก็ต", RED).expect("phuket");
    let before = h.view.surface().commands().len();
    assert!(h.view.select_province("แอตแลนติส", BLUE).is_none());
    assert_eq!(h.view.surface().commands().len(), before);
    assert_eq!(h.view.highlight().selection().expect("kept").members, vec!["ภูเก็ต".to_string()]);
}

#[tokio::test]
async fn pointer_hover_is_cosmetic() {
    let mut h = harness().await;
    h.view
        .handle_event(SurfaceEvent::PointerMove { at: LatLng::new(7.9, 98.3) })
        .await
        .expect("ok");
    assert_eq!(visible_geometries(&h.view), geometries_of(&h.view, "ภูเก็ต"));
    assert!(!h.view.highlight().is_active());

    h.view.handle_event(SurfaceEvent::PointerOut).await.expect("ok");
    assert!(visible_geometries(&h.view).is_empty());
}

#[test]
fn marker_size_never_shrinks_as_zoom_grows() {
    let config = EngineConfig::default();
    let layer = layers::MarkerLayer::new(1, config.marker);
    let mut previous = 0.0;
    let mut zoom = config.min_zoom;
    while zoom <= config.max_zoom {
        let size = layer.size_at(zoom);
        assert!(size >= previous, "size shrank at zoom {zoom}");
        previous = size;
        zoom += 0.25;
    }
}

#[tokio::test]
async fn search_distinguishes_too_short_from_no_match() {
    let mut h = harness().await;
    h.view.search_input("เ");
    h.clock.advance(300);
    assert!(h.view.poll().search_ran);
    assert_eq!(h.view.search().outcome(), &GazetteerOutcome::TooShort);

    h.view.search_input("เชียงใหม่");
    h.clock.advance(299);
    assert!(!h.view.poll().search_ran);
    h.clock.advance(1);
    assert!(h.view.poll().search_ran);
    let results = h.view.search().results();
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|e| e.province == "เชียงใหม่"));

    h.view.search_input("xyz");
    h.clock.advance(300);
    h.view.poll();
    assert_eq!(h.view.search().outcome(), &GazetteerOutcome::NoMatch);
}

#[tokio::test]
async fn search_selection_emits_location_and_clears_the_box() {
    let mut h = harness().await;
    h.view.search_input("ตลาดใหญ่");
    h.clock.advance(300);
    h.view.poll();

    let location = h.view.select_search_result(0).await.expect("resolved");
    assert_eq!(
        location,
        LocationData {
            lat: PHUKET.lat,
            lng: PHUKET.lng,
            province: "ภูเก็ต".into(),
            district: "เมืองภูเก็ต".into(),
            subdistrict: "ตำบลทดสอบ".into(),
            zone: Some("ภาคใต้".into()),
        }
    );
    assert_eq!(h.view.search().text(), "");
    assert!(h.view.search().results().is_empty());
    assert_eq!(h.view.drain_events(), vec![EngineEvent::LocationSelected(location)]);
    assert_eq!(h.view.surface().camera_target().center, PHUKET);
}

#[tokio::test]
async fn failed_search_selection_keeps_the_box() {
    let mut h = harness().await;
    *h.geocoder.failing.lock().expect("lock") = true;
    h.view.search_input("ตลาดใหญ่");
    h.clock.advance(300);
    h.view.poll();
    let before = h.view.search().outcome().clone();

    let e = h.view.select_search_result(0).await.expect_err("geocoder down");
    assert_eq!(e.kind(), NoticeKind::GeocodeFailed);
    assert_eq!(h.view.search().text(), "ตลาดใหญ่");
    assert_eq!(h.view.search().outcome(), &before);
    assert!(h.view.surface().camera_commands().is_empty());

    let e = h.view.select_search_result(9).await.expect_err("no such row");
    assert_eq!(e.kind(), NoticeKind::UnknownSearchResult);
}

#[tokio::test]
async fn clicking_a_marker_counts_one_view_and_refreshes_the_popup() {
    let mut h = harness().await;
    h.view.list_enter(DocumentId(2)).expect("known");
    h.view
        .handle_event(SurfaceEvent::MarkerClick { id: DocumentId(1) })
        .await
        .expect("opened");

    assert_eq!(h.counters.calls(), vec![(DocumentId(1), CounterKind::View)]);
    assert!(!h.view.hover().is_pending());

    let target = h.view.surface().camera_target();
    assert_eq!(target, Viewport::new(CHIANG_MAI, 15.0));
    h.clock.advance(800);
    assert_eq!(h.view.surface().camera().zoom, 15.0);

    let popups: Vec<u64> = h
        .view
        .surface()
        .commands()
        .iter()
        .filter_map(|c| match c {
            SurfaceCommand::OpenPopup { content } => Some(content.views),
            _ => None,
        })
        .collect();
    // Stale local count first, then the optimistic bump, then the source of truth.
    assert_eq!(popups, vec![10, 11, 42]);
    assert_eq!(h.view.surface().popup().expect("open").views, 42);

    // The pending hover on document 2 never fires.
    h.clock.advance(1_000);
    assert_eq!(h.view.poll().hover_fired, None);
}

#[tokio::test]
async fn opening_another_marker_closes_the_previous_popup() {
    let mut h = harness().await;
    h.view.click_marker(DocumentId(1)).await.expect("opened");
    h.view.click_marker(DocumentId(2)).await.expect("opened");
    assert_eq!(h.view.surface().popup().expect("open").document, DocumentId(2));
    assert!(h.view.surface().commands().contains(&SurfaceCommand::ClosePopup));
    assert_eq!(
        h.counters.calls(),
        vec![(DocumentId(1), CounterKind::View), (DocumentId(2), CounterKind::View)]
    );
}

#[tokio::test]
async fn counter_outage_never_blocks_the_popup() {
    let mut h = harness().await;
    *h.counters.failing.lock().expect("lock") = true;
    let shown = h.view.click_marker(DocumentId(1)).await.expect("still opens");
    assert_eq!(shown, DocumentCounts { views: 10, downloads: 1 });
    assert_eq!(h.view.state().catalog.counts(DocumentId(1)), Some(shown));
    assert_eq!(h.view.metrics().counter("counter.failures"), 2);
    assert_eq!(h.view.record_download(DocumentId(1)).await, Ok(None));
}

#[tokio::test]
async fn download_refreshes_the_open_popup() {
    let mut h = harness().await;
    h.view.click_marker(DocumentId(2)).await.expect("opened");
    let counts = h
        .view
        .record_download(DocumentId(2))
        .await
        .expect("known")
        .expect("counted");
    assert_eq!(counts.downloads, 2);
    assert_eq!(h.view.surface().popup().expect("open").downloads, 2);
}

#[tokio::test]
async fn map_click_inside_thailand_emits_location_data() {
    let mut h = harness().await;
    h.view
        .handle_event(SurfaceEvent::MapClick { at: CHIANG_MAI })
        .await
        .expect("resolved");
    let events = h.view.drain_events();
    let [EngineEvent::LocationSelected(loc)] = events.as_slice() else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(loc.province, "เชียงใหม่");
    assert_eq!(loc.zone.as_deref(), Some("ภาคเหนือ"));
}

#[tokio::test]
async fn map_click_outside_thailand_is_a_notice() {
    let mut h = harness().await;
    let e = h
        .view
        .map_click(LatLng::new(35.68, 139.69))
        .await
        .expect_err("outside");
    assert_eq!(e.kind(), NoticeKind::OutOfBounds);
    assert!(h.geocoder.calls.lock().expect("lock").is_empty());
    assert!(matches!(
        h.view.drain_events().as_slice(),
        [EngineEvent::Notice(n)] if n.kind == NoticeKind::OutOfBounds
    ));
    assert!(h.view.surface().commands().is_empty());
}

#[tokio::test]
async fn unavailable_boundaries_fall_back_to_circles() {
    let mut h = harness_with(Box::new(UnavailableBoundarySource)).await;
    let store = h.view.boundaries().expect("store");
    assert!(store.is_degraded());
    assert_eq!(store.len(), 77);
    assert_eq!(h.view.metrics().counter("boundary.degraded"), 1);

    h.view.select_province("ภูเก็ต", RED).expect("circle selection");
    let visible = visible_geometries(&h.view);
    assert_eq!(visible.len(), 1);
    assert!(matches!(
        visible[0],
        ShapeGeometry::Circle { radius_m, .. } if radius_m == 20_000.0
    ));
    // Markers still render from loaded data.
    assert_eq!(h.view.surface().markers().len(), 3);
}

#[tokio::test]
async fn unmount_cancels_timers_and_detaches_listeners() {
    let mut h = harness().await;
    h.view.select_province("ภูเก็ต", RED).expect("phuket");
    h.view.list_enter(DocumentId(1)).expect("known");
    let before = h.view.surface().camera_commands().len();

    assert!(h.view.unmount());
    assert!(h.view.surface().listeners().is_empty());
    assert!(h.view.surface().markers().is_empty());
    assert_eq!(h.view.surface().shapes().count(), 0);
    assert!(!h.view.hover().is_pending());

    h.clock.advance(5_000);
    h.view.poll();
    assert_eq!(h.view.surface().camera_commands().len(), before);
    h.view
        .handle_event(SurfaceEvent::MarkerClick { id: DocumentId(1) })
        .await
        .expect("dropped");
    assert!(h.counters.calls().is_empty());

    // Remounting reuses the dataset loaded the first time.
    h.view.mount().await;
    assert_eq!(h.view.surface().listeners().len(), 7);
    assert_eq!(h.view.hover().home(), Some(h.view.config().country_view));
}

#[tokio::test]
async fn legend_lists_categories_in_id_order() {
    let h = harness().await;
    let rows: Vec<i64> = h.view.legend().iter().map(|(c, _)| c.id).collect();
    assert_eq!(rows, vec![1, 2, 3]);
}

#[tokio::test]
async fn filter_hides_markers_and_closes_a_hidden_popup() {
    let mut h = harness().await;
    h.view.click_marker(DocumentId(2)).await.expect("opened");
    h.view
        .set_filter(DocumentFilter::with_categories([CategoryId(1)]));
    assert_eq!(
        h.view.surface().markers().keys().copied().collect::<Vec<_>>(),
        vec![DocumentId(1)]
    );
    assert!(h.view.surface().popup().is_none());
    assert_eq!(h.view.state().selected, None);
}

#[tokio::test]
async fn newest_documents_pulse() {
    let h = harness().await;
    let markers = h.view.surface().markers();
    // Three visible documents, three latest slots.
    assert!(markers.values().all(|m| m.pulse_px.is_some()));
    assert!(h.view.state().is_latest(DocumentId(3)));
    assert!(!h.view.state().is_latest(DocumentId(4)));
}

#[tokio::test]
async fn older_visible_document_gets_no_pulse() {
    let mut older = doc(5, 2, PHUKET, "ภูเก็ต", 2);
    older.created_at_ms = 0;
    let mut documents: Vec<GeoDocument> = catalog().documents().cloned().collect();
    documents.push(older);
    let snapshot = CatalogSnapshot::new(documents, catalog().categories().cloned());
    let h = harness_over(snapshot, Box::new(StaticBoundaries(BOUNDARIES))).await;

    let markers = h.view.surface().markers();
    assert_eq!(markers.len(), 4);
    assert_eq!(markers[&DocumentId(5)].pulse_px, None);
    for id in [1, 2, 3] {
        assert!(markers[&DocumentId(id)].pulse_px.is_some(), "document {id}");
        assert!(h.view.state().is_latest(DocumentId(id)));
    }
    assert!(!h.view.state().is_latest(DocumentId(5)));
}
