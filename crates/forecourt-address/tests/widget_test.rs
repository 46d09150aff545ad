//! Behavioural tests for the autocomplete widget task.
//!
//! Time is paused, so debounce and provider latency are exact and the
//! runtime advances the clock whenever every task is idle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use forecourt_address::{
    AddressAutocomplete, AutocompleteHandle, AutocompleteProps, SearchSettings, SearchStatus,
};
use forecourt_core::{
    AddressPrediction, Coordinates, ParsedAddress, PlaceDetails, PlaceId, RawAddressComponent,
    SessionToken,
};
use forecourt_places::{Lookup, PlacesError, PlacesProvider};
use tokio::sync::mpsc;
use tokio::time::sleep;

const LATENCY: Duration = Duration::from_millis(50);

#[derive(Default)]
struct FakePlaces {
    /// Per-query and per-place-id latency overrides.
    delays: HashMap<String, Duration>,
    fail_predictions: bool,
    fail_details: bool,
    queries: Mutex<Vec<(String, Option<SessionToken>)>>,
    resolves: Mutex<Vec<(String, Option<SessionToken>)>>,
}

impl FakePlaces {
    fn delay(mut self, key: &str, ms: u64) -> Self {
        self.delays.insert(key.into(), Duration::from_millis(ms));
        self
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    fn resolves(&self) -> Vec<(String, Option<SessionToken>)> {
        self.resolves.lock().unwrap().clone()
    }

    fn latency(&self, key: &str) -> Duration {
        self.delays.get(key).copied().unwrap_or(LATENCY)
    }
}

#[async_trait]
impl PlacesProvider for FakePlaces {
    async fn predictions(
        &self,
        query: &str,
        session: Option<SessionToken>,
    ) -> Result<Lookup<Vec<AddressPrediction>>, PlacesError> {
        self.queries.lock().unwrap().push((query.to_string(), session));
        sleep(self.latency(query)).await;
        if self.fail_predictions {
            return Err(PlacesError::QuotaExceeded {
                endpoint: "GET /place/autocomplete".into(),
                message: "over limit".into(),
            });
        }
        if query.starts_with("zzz") {
            return Ok(Lookup::Empty);
        }
        Ok(Lookup::Found(
            (1..=2)
                .map(|n| AddressPrediction {
                    description: format!("{n} {query}, London, UK"),
                    place_id: PlaceId::new(format!("{query}-{n}")).unwrap(),
                    main_text: format!("{n} {query}"),
                    secondary_text: "London, UK".into(),
                })
                .collect(),
        ))
    }

    async fn place_details(
        &self,
        place_id: &PlaceId,
        session: Option<SessionToken>,
    ) -> Result<Lookup<PlaceDetails>, PlacesError> {
        self.resolves
            .lock()
            .unwrap()
            .push((place_id.as_str().to_string(), session));
        sleep(self.latency(place_id.as_str())).await;
        if self.fail_details {
            return Err(PlacesError::PermissionDenied {
                endpoint: "GET /place/details".into(),
                message: "key restricted".into(),
            });
        }
        let comp = |name: &str, kind: &str| RawAddressComponent::new(name, name, [kind]);
        Ok(Lookup::Found(PlaceDetails {
            components: vec![
                comp("10", "street_number"),
                comp("Downing Street", "route"),
                comp("London", "postal_town"),
                comp("United Kingdom", "country"),
                comp("SW1A 2AA", "postal_code"),
            ],
            formatted_address: format!("{place_id}, London SW1A 2AA, UK"),
            coordinates: Coordinates {
                lat: 51.5033635,
                lng: -0.1276248,
            },
        }))
    }
}

struct Mounted {
    handle: AutocompleteHandle,
    places: Arc<FakePlaces>,
    selected: mpsc::UnboundedReceiver<ParsedAddress>,
}

impl Mounted {
    fn selected(&mut self) -> Vec<ParsedAddress> {
        let mut out = Vec::new();
        while let Ok(addr) = self.selected.try_recv() {
            out.push(addr);
        }
        out
    }
}

fn mount_with(places: FakePlaces, props: AutocompleteProps) -> Mounted {
    let places = Arc::new(places);
    let (tx, selected) = mpsc::unbounded_channel();
    let handle = AddressAutocomplete::spawn(
        Arc::clone(&places),
        SearchSettings::default(),
        props,
        move |addr| {
            let _ = tx.send(addr);
        },
    );
    Mounted {
        handle,
        places,
        selected,
    }
}

fn mount(places: FakePlaces) -> Mounted {
    mount_with(places, AutocompleteProps::default())
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_issues_one_request() {
    let mut w = mount(FakePlaces::default());
    for text in ["d", "do", "dow", "down", "downi", "downin", "downing"] {
        w.handle.input(text);
        sleep(Duration::from_millis(80)).await;
    }
    let view = w.handle.settled().await.unwrap();
    assert_eq!(w.places.queries(), vec!["downing"]);
    assert_eq!(view.status, SearchStatus::HasPredictions(2));
    assert_eq!(view.predictions[0].description, "1 downing, London, UK");
}

#[tokio::test(start_paused = true)]
async fn nothing_is_sent_before_the_quiet_period() {
    let w = mount(FakePlaces::default());
    w.handle.input("downing");
    sleep(Duration::from_millis(299)).await;
    assert!(w.places.queries().is_empty());
    assert!(w.handle.view().is_busy());
    sleep(Duration::from_millis(2)).await;
    assert_eq!(w.places.queries(), vec!["downing"]);
}

#[tokio::test(start_paused = true)]
async fn short_query_never_reaches_provider() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("do");
    sleep(Duration::from_secs(1)).await;
    let view = w.handle.settled().await.unwrap();
    assert!(w.places.queries().is_empty());
    assert_eq!(view.status, SearchStatus::Idle);
    assert!(!view.show_no_results);
}

#[tokio::test(start_paused = true)]
async fn zero_results_shows_indicator_until_query_shrinks() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("zzzz");
    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.status, SearchStatus::NoResults);
    assert!(view.show_no_results);
    assert!(view.predictions.is_empty());

    w.handle.input("zz");
    let view = w.handle.settled().await.unwrap();
    assert!(!view.show_no_results);
    assert_eq!(w.places.queries(), vec!["zzzz"]);
}

#[tokio::test(start_paused = true)]
async fn provider_failure_renders_empty_without_indicator() {
    let mut w = mount(FakePlaces {
        fail_predictions: true,
        ..FakePlaces::default()
    });
    w.handle.input("downing");
    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.status, SearchStatus::Error);
    assert!(view.predictions.is_empty());
    assert!(!view.show_no_results);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_one() {
    let mut w = mount(FakePlaces::default().delay("down", 600));
    w.handle.input("down");
    sleep(Duration::from_millis(350)).await;
    // "down" is in flight until t=900.
    w.handle.input("downing");
    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.predictions[0].main_text, "1 downing");

    sleep(Duration::from_secs(1)).await;
    let view = w.handle.view();
    assert_eq!(w.places.queries(), vec!["down", "downing"]);
    assert_eq!(view.predictions[0].main_text, "1 downing");
    assert_eq!(view.status, SearchStatus::HasPredictions(2));
}

#[tokio::test(start_paused = true)]
async fn clear_cancels_pending_debounce() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("downing");
    sleep(Duration::from_millis(100)).await;
    w.handle.clear();
    sleep(Duration::from_secs(1)).await;
    let view = w.handle.settled().await.unwrap();
    assert!(w.places.queries().is_empty());
    assert_eq!(view.query, "");
    assert_eq!(view.status, SearchStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn selection_resolves_and_calls_back_once() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("downing");
    w.handle.settled().await.unwrap();

    w.handle.select(0);
    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.query, "1 downing, London, UK");
    assert!(view.predictions.is_empty());
    assert!(!view.show_no_results);
    assert!(!view.resolving);

    sleep(Duration::from_secs(1)).await;
    let selected = w.selected();
    assert_eq!(selected.len(), 1);
    let addr = &selected[0];
    assert_eq!(addr.street_line(), "10 Downing Street");
    assert_eq!(addr.city, "London");
    assert_eq!(addr.postcode, "SW1A 2AA");
    assert_eq!(addr.country, "United Kingdom");
    assert_eq!(addr.full_address, "downing-1, London SW1A 2AA, UK");
}

#[tokio::test(start_paused = true)]
async fn details_call_reuses_the_search_session() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("down");
    w.handle.settled().await.unwrap();
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.select(1);
    w.handle.settled().await.unwrap();

    let sessions: Vec<_> = w.places.queries.lock().unwrap().iter().map(|(_, s)| *s).collect();
    assert!(sessions[0].is_some());
    assert_eq!(sessions[0], sessions[1]);
    let resolves = w.places.resolves();
    assert_eq!(resolves, vec![("downing-2".to_string(), sessions[0])]);

    // The next search opens a fresh session.
    w.handle.input("whitehall");
    w.handle.settled().await.unwrap();
    let next = w.places.queries.lock().unwrap()[2].1;
    assert!(next.is_some());
    assert_ne!(next, sessions[0]);
}

#[tokio::test(start_paused = true)]
async fn failed_resolve_does_not_call_back() {
    let mut w = mount(FakePlaces {
        fail_details: true,
        ..FakePlaces::default()
    });
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.select(0);
    let view = w.handle.settled().await.unwrap();
    assert!(!view.resolving);
    assert!(w.selected().is_empty());
    assert_eq!(w.places.resolves().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn only_the_latest_selection_calls_back() {
    let mut w = mount(FakePlaces::default().delay("downing-1", 2_000));
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.select(0);

    w.handle.input("whitehall");
    sleep(Duration::from_millis(400)).await;
    assert_eq!(w.handle.view().predictions.len(), 2);
    w.handle.select(0);

    sleep(Duration::from_secs(3)).await;
    let selected = w.selected();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].full_address, "whitehall-1, London SW1A 2AA, UK");
}

#[tokio::test(start_paused = true)]
async fn clear_abandons_in_flight_resolve() {
    let mut w = mount(FakePlaces::default().delay("downing-1", 500));
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.select(0);
    sleep(Duration::from_millis(100)).await;
    w.handle.clear();
    sleep(Duration::from_secs(1)).await;
    assert!(w.selected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn host_value_change_abandons_in_flight_resolve() {
    let mut w = mount(FakePlaces::default().delay("downing-1", 500));
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.select(0);
    sleep(Duration::from_millis(100)).await;
    w.handle.set_value("host reset value");
    sleep(Duration::from_secs(1)).await;

    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.query, "host reset value");
    assert!(!view.resolving);
    assert!(w.selected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn click_outside_during_flight_keeps_list_closed() {
    let mut w = mount(FakePlaces::default().delay("downing", 500));
    w.handle.input("downing");
    // Request goes out at t=300 and answers at t=800.
    sleep(Duration::from_millis(400)).await;
    w.handle.click_outside();
    sleep(Duration::from_secs(1)).await;

    let view = w.handle.settled().await.unwrap();
    assert_eq!(w.places.queries(), vec!["downing"]);
    assert!(view.predictions.is_empty());
    assert_eq!(view.status, SearchStatus::Idle);
    assert_eq!(view.query, "downing");
}

#[tokio::test(start_paused = true)]
async fn click_outside_hides_predictions_and_keeps_text() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    w.handle.click_outside();
    let view = w.handle.settled().await.unwrap();
    assert!(view.predictions.is_empty());
    assert_eq!(view.query, "downing");
    assert_eq!(view.status, SearchStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn disabled_widget_ignores_typing() {
    let mut w = mount_with(
        FakePlaces::default(),
        AutocompleteProps {
            disabled: true,
            ..AutocompleteProps::default()
        },
    );
    w.handle.input("downing");
    sleep(Duration::from_secs(1)).await;
    let view = w.handle.settled().await.unwrap();
    assert!(view.disabled);
    assert_eq!(view.query, "");
    assert!(w.places.queries().is_empty());

    w.handle.set_disabled(false);
    w.handle.input("downing");
    w.handle.settled().await.unwrap();
    assert_eq!(w.places.queries(), vec!["downing"]);
}

#[tokio::test(start_paused = true)]
async fn disabling_mid_debounce_cancels_request() {
    let mut w = mount(FakePlaces::default());
    w.handle.input("downing");
    sleep(Duration::from_millis(100)).await;
    w.handle.set_disabled(true);
    sleep(Duration::from_secs(1)).await;
    w.handle.settled().await.unwrap();
    assert!(w.places.queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn initial_value_is_shown_without_searching() {
    let mut w = mount_with(
        FakePlaces::default(),
        AutocompleteProps {
            initial_value: "10 Downing Street, London, SW1A 2AA".into(),
            ..AutocompleteProps::default()
        },
    );
    assert_eq!(w.handle.view().query, "10 Downing Street, London, SW1A 2AA");

    w.handle.set_value("Whitehall, London");
    sleep(Duration::from_secs(1)).await;
    let view = w.handle.settled().await.unwrap();
    assert_eq!(view.query, "Whitehall, London");
    assert!(w.places.queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn default_display_options() {
    let w = mount(FakePlaces::default());
    let options = w.handle.options();
    assert_eq!(options.placeholder, "Start typing an address...");
    assert_eq!(options.label, "Address");
    assert!(options.show_label);
    assert_eq!(options.class_name, "");
}

#[tokio::test(start_paused = true)]
async fn unmount_drops_pending_work() {
    let w = mount(FakePlaces::default());
    w.handle.input("downing");
    sleep(Duration::from_millis(100)).await;
    let places = Arc::clone(&w.places);
    drop(w);
    sleep(Duration::from_secs(1)).await;
    assert!(places.queries().is_empty());
}
