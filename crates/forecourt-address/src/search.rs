//! # Search Controller
//!
//! Synchronous state machine behind the autocomplete box. It owns the query
//! text, the current predictions, the debounce deadline and the session
//! token, and decides which provider responses may still be applied.
//!
//! ## States
//!
//! ```text
//!            input(<3)                 input(>=3)
//!   Idle ◄──────────────── any ────────────────► (deadline armed)
//!    ▲                                                  │ fire()
//!    │ clear / select / dismiss                         ▼
//!    └──────────── HasPredictions | NoResults | Error ◄─ Loading
//!                                       complete(seq)
//! ```
//!
//! ## Sequencing
//!
//! Every change to the query bumps a sequence number. A request carries the
//! sequence it was issued under, and [`SearchMachine::complete`] drops any
//! response whose sequence is no longer current. Out-of-order responses
//! can therefore never overwrite newer results.
//!
//! Time is passed in rather than read, so the machine is fully
//! deterministic; the widget task in [`crate::widget`] supplies the clock.

use forecourt_core::{AddressPrediction, SessionToken};
use forecourt_places::{Lookup, PlacesError};
use serde::Serialize;
use tokio::time::Instant;

use crate::settings::SearchSettings;

/// What the dropdown should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "count", rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Loading,
    HasPredictions(usize),
    NoResults,
    /// The last request failed. Renders like `Idle`; the failure is only
    /// logged.
    Error,
}

/// A prediction request the caller must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub sequence: u64,
    pub query: String,
    pub session: SessionToken,
}

/// A prediction the user picked, ready for detail resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub prediction: AddressPrediction,
    /// Token the session's autocomplete calls used. Handed to the details
    /// call, which ends the session.
    pub session: Option<SessionToken>,
}

/// Whether a completed response was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Clone)]
pub struct SearchMachine {
    settings: SearchSettings,
    query: String,
    status: SearchStatus,
    predictions: Vec<AddressPrediction>,
    sequence: u64,
    deadline: Option<Instant>,
    session: Option<SessionToken>,
    disabled: bool,
}

impl SearchMachine {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            query: String::new(),
            status: SearchStatus::Idle,
            predictions: Vec::new(),
            sequence: 0,
            deadline: None,
            session: None,
            disabled: false,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn predictions(&self) -> &[AddressPrediction] {
        &self.predictions
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the pending debounce fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a request is waiting on the debounce or in flight.
    pub fn is_busy(&self) -> bool {
        self.deadline.is_some() || self.status == SearchStatus::Loading
    }

    /// The "no addresses found" indicator is shown only for a completed
    /// empty search on a query that is still long enough.
    pub fn shows_no_results(&self) -> bool {
        self.status == SearchStatus::NoResults && self.settings.is_searchable(&self.query)
    }

    /// Replace the text without searching. Used for the host's initial
    /// value; anything pending is abandoned.
    pub fn seed(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.reset();
    }

    /// A keystroke. Returns `false` when the box is disabled.
    ///
    /// Short queries reset to `Idle` immediately. Longer ones (re)arm the
    /// debounce at `now + debounce`; the current list stays visible until
    /// the next response lands.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) -> bool {
        if self.disabled {
            return false;
        }
        self.query = text.into();
        self.sequence += 1;
        if self.settings.is_searchable(&self.query) {
            self.deadline = Some(now + self.settings.debounce());
            if self.status == SearchStatus::Loading {
                // The in-flight response is stale now.
                self.status = if self.predictions.is_empty() {
                    SearchStatus::Idle
                } else {
                    SearchStatus::HasPredictions(self.predictions.len())
                };
            }
        } else {
            self.deadline = None;
            self.predictions.clear();
            self.status = SearchStatus::Idle;
        }
        true
    }

    /// Issue the debounced request if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<PredictionRequest> {
        match self.deadline {
            Some(at) if at <= now => {}
            _ => return None,
        }
        self.deadline = None;
        if self.disabled || !self.settings.is_searchable(&self.query) {
            return None;
        }
        self.status = SearchStatus::Loading;
        let session = *self.session.get_or_insert_with(SessionToken::new);
        Some(PredictionRequest {
            sequence: self.sequence,
            query: self.query.trim().to_string(),
            session,
        })
    }

    /// Apply the outcome of the request issued under `sequence`.
    pub fn complete(
        &mut self,
        sequence: u64,
        outcome: Result<Lookup<Vec<AddressPrediction>>, PlacesError>,
    ) -> Completion {
        if sequence != self.sequence || self.status != SearchStatus::Loading {
            tracing::debug!(sequence, current = self.sequence, "dropping stale prediction response");
            return Completion::Stale;
        }
        match outcome {
            Ok(Lookup::Found(predictions)) => {
                self.status = status_for(&predictions);
                self.predictions = predictions;
            }
            Ok(Lookup::Empty) => {
                self.predictions.clear();
                self.status = SearchStatus::NoResults;
            }
            Err(err) => {
                if err.is_transient() {
                    tracing::warn!(kind = err.kind(), sequence, error = %err, "address prediction request failed");
                } else {
                    tracing::error!(kind = err.kind(), sequence, error = %err, "address prediction request rejected");
                }
                self.predictions.clear();
                self.status = SearchStatus::Error;
            }
        }
        Completion::Applied
    }

    /// Pick a prediction from the current list.
    ///
    /// The list closes, the box shows the prediction's description, and the
    /// session token is handed over so the next search starts a new session.
    pub fn select(&mut self, index: usize) -> Option<Selection> {
        if self.disabled || index >= self.predictions.len() {
            return None;
        }
        let prediction = self.predictions.swap_remove(index);
        self.query = prediction.description.clone();
        self.reset();
        Some(Selection {
            prediction,
            session: self.session.take(),
        })
    }

    /// Empty the box. Always succeeds, even mid-request.
    pub fn clear(&mut self) {
        self.query.clear();
        self.reset();
    }

    /// Hide the dropdown after a click outside. The text and any pending
    /// debounce are left alone; a request already in flight is dropped so
    /// its response cannot reopen the list.
    pub fn dismiss(&mut self) {
        self.predictions.clear();
        match self.status {
            SearchStatus::Loading => {
                self.sequence += 1;
                self.status = SearchStatus::Idle;
            }
            SearchStatus::HasPredictions(_) | SearchStatus::NoResults => {
                self.status = SearchStatus::Idle;
            }
            SearchStatus::Idle | SearchStatus::Error => {}
        }
    }

    /// Disabling abandons pending and in-flight work and hides the list.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && !self.disabled {
            self.reset();
        }
        self.disabled = disabled;
    }

    fn reset(&mut self) {
        self.sequence += 1;
        self.deadline = None;
        self.predictions.clear();
        self.status = SearchStatus::Idle;
    }
}

fn status_for(predictions: &[AddressPrediction]) -> SearchStatus {
    if predictions.is_empty() {
        SearchStatus::NoResults
    } else {
        SearchStatus::HasPredictions(predictions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecourt_core::PlaceId;
    use std::time::Duration;

    fn prediction(n: usize) -> AddressPrediction {
        AddressPrediction {
            description: format!("{n} Downing Street, London, UK"),
            place_id: PlaceId::new(format!("place-{n}")).unwrap(),
            main_text: format!("{n} Downing Street"),
            secondary_text: "London, UK".into(),
        }
    }

    fn machine() -> SearchMachine {
        SearchMachine::new(SearchSettings::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_idle() {
        let m = machine();
        assert_eq!(m.status(), SearchStatus::Idle);
        assert_eq!(m.query(), "");
        assert!(m.deadline().is_none());
        assert!(!m.is_busy());
    }

    #[test]
    fn short_query_never_arms_debounce() {
        let t0 = Instant::now();
        let mut m = machine();
        assert!(m.input("do", t0));
        assert!(m.deadline().is_none());
        assert_eq!(m.fire(t0 + ms(1000)), None);
        assert_eq!(m.status(), SearchStatus::Idle);
    }

    #[test]
    fn whitespace_does_not_count_toward_minimum() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("  do  ", t0);
        assert!(m.deadline().is_none());
    }

    #[test]
    fn fires_only_after_quiet_period() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("dow", t0);
        assert_eq!(m.fire(t0 + ms(299)), None);
        let req = m.fire(t0 + ms(300)).unwrap();
        assert_eq!(req.query, "dow");
        assert_eq!(m.status(), SearchStatus::Loading);
        assert!(m.deadline().is_none());
    }

    #[test]
    fn keystrokes_reset_the_deadline() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("dow", t0);
        m.input("down", t0 + ms(200));
        m.input("downi", t0 + ms(400));
        assert_eq!(m.fire(t0 + ms(650)), None);
        let req = m.fire(t0 + ms(700)).unwrap();
        assert_eq!(req.query, "downi");
    }

    #[test]
    fn request_query_is_trimmed() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("  10 downing  ", t0);
        assert_eq!(m.fire(t0 + ms(300)).unwrap().query, "10 downing");
    }

    #[test]
    fn found_predictions_are_shown() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        let applied = m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1), prediction(2)])));
        assert_eq!(applied, Completion::Applied);
        assert_eq!(m.status(), SearchStatus::HasPredictions(2));
        assert_eq!(m.predictions().len(), 2);
        assert!(!m.shows_no_results());
    }

    #[test]
    fn empty_lookup_shows_no_results() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("zzzzzz", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Empty));
        assert_eq!(m.status(), SearchStatus::NoResults);
        assert!(m.shows_no_results());
    }

    #[test]
    fn errors_render_as_empty_without_indicator() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(
            req.sequence,
            Err(PlacesError::QuotaExceeded {
                endpoint: "GET /place/autocomplete".into(),
                message: "daily limit".into(),
            }),
        );
        assert_eq!(m.status(), SearchStatus::Error);
        assert!(m.predictions().is_empty());
        assert!(!m.shows_no_results());
    }

    #[test]
    fn stale_response_is_discarded() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("down", t0);
        let first = m.fire(t0 + ms(300)).unwrap();
        m.input("downing", t0 + ms(310));
        let second = m.fire(t0 + ms(610)).unwrap();

        assert_eq!(
            m.complete(second.sequence, Ok(Lookup::Found(vec![prediction(2)]))),
            Completion::Applied
        );
        assert_eq!(
            m.complete(first.sequence, Ok(Lookup::Found(vec![prediction(1), prediction(3)]))),
            Completion::Stale
        );
        assert_eq!(m.predictions(), &[prediction(2)]);
    }

    #[test]
    fn typing_during_flight_leaves_loading() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("down", t0);
        m.fire(t0 + ms(300)).unwrap();
        m.input("downi", t0 + ms(350));
        assert_eq!(m.status(), SearchStatus::Idle);
        assert!(!m.shows_no_results());
        assert!(m.is_busy());
    }

    #[test]
    fn previous_list_stays_while_debouncing() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1)])));
        m.input("downing s", t0 + ms(500));
        assert_eq!(m.predictions().len(), 1);
        assert_eq!(m.status(), SearchStatus::HasPredictions(1));
    }

    #[test]
    fn shrinking_below_minimum_clears_list_and_deadline() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1)])));
        m.input("do", t0 + ms(400));
        assert!(m.predictions().is_empty());
        assert_eq!(m.status(), SearchStatus::Idle);
        assert!(m.deadline().is_none());
    }

    #[test]
    fn no_results_indicator_hidden_once_query_shortens() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("zzzz", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Empty));
        m.input("zz", t0 + ms(400));
        assert!(!m.shows_no_results());
    }

    #[test]
    fn clear_cancels_pending_debounce() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        m.clear();
        assert_eq!(m.fire(t0 + ms(1000)), None);
        assert_eq!(m.query(), "");
        assert_eq!(m.status(), SearchStatus::Idle);
    }

    #[test]
    fn clear_mid_flight_drops_the_response() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.clear();
        assert_eq!(m.status(), SearchStatus::Idle);
        assert_eq!(
            m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1)]))),
            Completion::Stale
        );
        assert!(m.predictions().is_empty());
    }

    #[test]
    fn select_closes_list_and_hands_over_session() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1), prediction(2)])));

        let sel = m.select(1).unwrap();
        assert_eq!(sel.prediction, prediction(2));
        assert_eq!(sel.session, Some(req.session));
        assert_eq!(m.query(), "2 Downing Street, London, UK");
        assert!(m.predictions().is_empty());
        assert_eq!(m.status(), SearchStatus::Idle);
        assert!(!m.shows_no_results());
    }

    #[test]
    fn session_token_is_reused_until_selection() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("down", t0);
        let a = m.fire(t0 + ms(300)).unwrap();
        m.input("downing", t0 + ms(400));
        let b = m.fire(t0 + ms(700)).unwrap();
        assert_eq!(a.session, b.session);
        m.complete(b.sequence, Ok(Lookup::Found(vec![prediction(1)])));
        m.select(0).unwrap();

        m.input("whitehall", t0 + ms(1000));
        let c = m.fire(t0 + ms(1300)).unwrap();
        assert_ne!(c.session, a.session);
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut m = machine();
        assert_eq!(m.select(0), None);
    }

    #[test]
    fn dismiss_hides_list_but_keeps_text() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1)])));
        m.dismiss();
        assert!(m.predictions().is_empty());
        assert_eq!(m.status(), SearchStatus::Idle);
        assert_eq!(m.query(), "downing");
    }

    #[test]
    fn dismiss_during_flight_drops_the_response() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        let req = m.fire(t0 + ms(300)).unwrap();
        m.dismiss();
        assert_eq!(m.status(), SearchStatus::Idle);
        assert!(!m.is_busy());
        assert_eq!(
            m.complete(req.sequence, Ok(Lookup::Found(vec![prediction(1)]))),
            Completion::Stale
        );
        assert!(m.predictions().is_empty());
        assert_eq!(m.query(), "downing");
    }

    #[test]
    fn dismiss_keeps_pending_debounce() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        m.dismiss();
        assert!(m.fire(t0 + ms(300)).is_some());
    }

    #[test]
    fn disabled_ignores_input_and_cancels_work() {
        let t0 = Instant::now();
        let mut m = machine();
        m.input("downing", t0);
        m.set_disabled(true);
        assert!(m.deadline().is_none());
        assert!(!m.input("whitehall", t0 + ms(10)));
        assert_eq!(m.query(), "downing");
        assert_eq!(m.fire(t0 + ms(1000)), None);

        m.set_disabled(false);
        assert!(m.input("whitehall", t0 + ms(20)));
        assert!(m.fire(t0 + ms(320)).is_some());
    }

    #[test]
    fn seed_sets_text_without_searching() {
        let t0 = Instant::now();
        let mut m = machine();
        m.seed("10 Downing Street, London, SW1A 2AA");
        assert_eq!(m.query(), "10 Downing Street, London, SW1A 2AA");
        assert!(m.deadline().is_none());
        assert_eq!(m.fire(t0 + ms(1000)), None);
    }

    #[test]
    fn custom_settings_apply() {
        let t0 = Instant::now();
        let mut m = SearchMachine::new(SearchSettings {
            debounce_ms: 50,
            min_query_len: 5,
        });
        m.input("down", t0);
        assert!(m.deadline().is_none());
        m.input("downi", t0);
        assert!(m.fire(t0 + ms(50)).is_some());
    }
}
