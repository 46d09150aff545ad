//! # Address Autocomplete Widget
//!
//! Async driver around [`SearchMachine`]. One spawned task owns the machine
//! and multiplexes three sources with `tokio::select!`:
//!
//! - **events** from the [`AutocompleteHandle`] (keystrokes, selection,
//!   clear, click outside, enable/disable, host value changes)
//! - **completions** from provider calls running on their own tasks
//! - **the debounce deadline**, when one is armed
//!
//! After every step the task publishes a [`SearchView`] on a `watch`
//! channel. Provider calls never block the loop, so typing stays
//! responsive while requests are in flight.
//!
//! Selecting a prediction starts a details resolve under its own sequence
//! number. Only the latest resolve may reach the callback, and a failed
//! resolve is logged without calling it.
//!
//! Dropping the handle unmounts the widget: the task exits and any pending
//! timer or late response goes with it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use forecourt_core::{AddressPrediction, ParsedAddress, PlaceDetails, PlaceId};
use forecourt_places::{Lookup, PlacesError, PlacesProvider};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::decompose::decompose_with_source;
use crate::search::{SearchMachine, SearchStatus, Selection};
use crate::settings::SearchSettings;

/// Presentation options passed through from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayOptions {
    pub placeholder: String,
    pub label: String,
    pub show_label: bool,
    pub class_name: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            placeholder: "Start typing an address...".into(),
            label: "Address".into(),
            show_label: true,
            class_name: String::new(),
        }
    }
}

/// Initial props for a widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutocompleteProps {
    /// Text shown in the box on mount. Does not trigger a search.
    pub initial_value: String,
    pub disabled: bool,
    pub options: DisplayOptions,
}

/// Everything a renderer needs, published after each step of the task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub query: String,
    pub status: SearchStatus,
    pub predictions: Vec<AddressPrediction>,
    pub show_no_results: bool,
    pub disabled: bool,
    /// A keystroke is waiting on the debounce.
    pub pending: bool,
    /// A selected prediction is being resolved.
    pub resolving: bool,
    /// Number of handle events the task has applied.
    #[serde(skip)]
    pub processed: u64,
}

impl SearchView {
    /// Whether a spinner should show.
    pub fn is_busy(&self) -> bool {
        self.pending || self.resolving || self.status == SearchStatus::Loading
    }
}

#[derive(Debug)]
enum WidgetEvent {
    Input(String),
    Select(usize),
    Clear,
    ClickOutside,
    SetDisabled(bool),
    SetValue(String),
}

enum Finished {
    Predictions {
        sequence: u64,
        outcome: Result<Lookup<Vec<AddressPrediction>>, PlacesError>,
    },
    Details {
        sequence: u64,
        place_id: PlaceId,
        outcome: Result<Lookup<PlaceDetails>, PlacesError>,
    },
}

/// Host side of a mounted widget.
#[derive(Debug)]
pub struct AutocompleteHandle {
    events: mpsc::UnboundedSender<WidgetEvent>,
    view: watch::Receiver<SearchView>,
    sent: AtomicU64,
    options: DisplayOptions,
    task: JoinHandle<()>,
}

impl AutocompleteHandle {
    /// The user typed; `text` is the full box contents.
    pub fn input(&self, text: impl Into<String>) {
        self.send(WidgetEvent::Input(text.into()));
    }

    /// The user picked the prediction at `index` in the current view.
    pub fn select(&self, index: usize) {
        self.send(WidgetEvent::Select(index));
    }

    pub fn clear(&self) {
        self.send(WidgetEvent::Clear);
    }

    /// A pointer press landed outside the widget.
    pub fn click_outside(&self) {
        self.send(WidgetEvent::ClickOutside);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.send(WidgetEvent::SetDisabled(disabled));
    }

    /// The host replaced the initial value.
    pub fn set_value(&self, text: impl Into<String>) {
        self.send(WidgetEvent::SetValue(text.into()));
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Latest published view.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// A receiver for rendering on change.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Wait until every event sent so far has been applied and nothing is
    /// pending or in flight. Returns `None` if the task has stopped.
    pub async fn settled(&mut self) -> Option<SearchView> {
        let sent = self.sent.load(Ordering::Acquire);
        self.view
            .wait_for(|v| v.processed >= sent && !v.is_busy())
            .await
            .ok()
            .map(|v| v.clone())
    }

    fn send(&self, event: WidgetEvent) {
        if self.events.send(event).is_ok() {
            self.sent.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl Drop for AutocompleteHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Mounts address autocomplete widgets.
pub struct AddressAutocomplete;

impl AddressAutocomplete {
    /// Spawn a widget task on the current runtime.
    ///
    /// `on_address_select` is called once per successfully resolved
    /// selection, with the decomposed address.
    pub fn spawn<P, F>(
        provider: Arc<P>,
        settings: SearchSettings,
        props: AutocompleteProps,
        on_address_select: F,
    ) -> AutocompleteHandle
    where
        P: PlacesProvider + ?Sized + 'static,
        F: FnMut(ParsedAddress) + Send + 'static,
    {
        let mut machine = SearchMachine::new(settings);
        machine.seed(props.initial_value);
        machine.set_disabled(props.disabled);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(render(&machine, false, 0));

        let task = WidgetTask {
            provider,
            machine,
            on_address_select: Box::new(on_address_select),
            finished: finished_tx,
            view: view_tx,
            resolve_sequence: 0,
            resolving: false,
            processed: 0,
        };

        AutocompleteHandle {
            events: events_tx,
            view: view_rx,
            sent: AtomicU64::new(0),
            options: props.options,
            task: tokio::spawn(task.run(events_rx, finished_rx)),
        }
    }
}

struct WidgetTask<P: ?Sized> {
    provider: Arc<P>,
    machine: SearchMachine,
    on_address_select: Box<dyn FnMut(ParsedAddress) + Send>,
    finished: mpsc::UnboundedSender<Finished>,
    view: watch::Sender<SearchView>,
    resolve_sequence: u64,
    resolving: bool,
    processed: u64,
}

impl<P> WidgetTask<P>
where
    P: PlacesProvider + ?Sized + 'static,
{
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<WidgetEvent>,
        mut finished: mpsc::UnboundedReceiver<Finished>,
    ) {
        loop {
            let deadline = self.machine.deadline();
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(event) => {
                        self.on_event(event);
                        self.processed += 1;
                    }
                    None => break,
                },
                Some(done) = finished.recv() => self.on_finished(done),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_deadline();
                }
            }
            self.publish();
        }
        tracing::debug!("address autocomplete unmounted");
    }

    fn on_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::Input(text) => {
                self.machine.input(text, Instant::now());
            }
            WidgetEvent::Select(index) => {
                if let Some(selection) = self.machine.select(index) {
                    self.resolve(selection);
                }
            }
            WidgetEvent::Clear => {
                self.machine.clear();
                self.abandon_resolve();
            }
            WidgetEvent::ClickOutside => self.machine.dismiss(),
            WidgetEvent::SetDisabled(disabled) => {
                self.machine.set_disabled(disabled);
                if disabled {
                    self.abandon_resolve();
                }
            }
            WidgetEvent::SetValue(text) => {
                self.machine.seed(text);
                self.abandon_resolve();
            }
        }
    }

    fn on_deadline(&mut self) {
        let Some(request) = self.machine.fire(Instant::now()) else {
            return;
        };
        tracing::debug!(sequence = request.sequence, "requesting address predictions");
        let provider = Arc::clone(&self.provider);
        let finished = self.finished.clone();
        tokio::spawn(async move {
            let outcome = provider
                .predictions(&request.query, Some(request.session))
                .await;
            let _ = finished.send(Finished::Predictions {
                sequence: request.sequence,
                outcome,
            });
        });
    }

    fn resolve(&mut self, selection: Selection) {
        self.resolve_sequence += 1;
        self.resolving = true;
        let sequence = self.resolve_sequence;
        let place_id = selection.prediction.place_id;
        tracing::debug!(sequence, %place_id, "resolving selected address");

        let provider = Arc::clone(&self.provider);
        let finished = self.finished.clone();
        tokio::spawn(async move {
            let outcome = provider.place_details(&place_id, selection.session).await;
            let _ = finished.send(Finished::Details {
                sequence,
                place_id,
                outcome,
            });
        });
    }

    fn abandon_resolve(&mut self) {
        if self.resolving {
            self.resolve_sequence += 1;
            self.resolving = false;
        }
    }

    fn on_finished(&mut self, done: Finished) {
        match done {
            Finished::Predictions { sequence, outcome } => {
                self.machine.complete(sequence, outcome);
            }
            Finished::Details {
                sequence,
                place_id,
                outcome,
            } => {
                if sequence != self.resolve_sequence {
                    tracing::debug!(sequence, %place_id, "dropping superseded place details");
                    return;
                }
                self.resolving = false;
                match outcome {
                    Ok(Lookup::Found(details)) => {
                        let decomposed = decompose_with_source(&details);
                        tracing::info!(
                            %place_id,
                            postcode_source = %decomposed.postcode_source,
                            "address selected"
                        );
                        (self.on_address_select)(decomposed.address);
                    }
                    Ok(Lookup::Empty) => {
                        tracing::warn!(%place_id, "place details returned nothing for selection");
                    }
                    Err(err) => {
                        tracing::warn!(
                            %place_id,
                            kind = err.kind(),
                            error = %err,
                            "place details request failed"
                        );
                    }
                }
            }
        }
    }

    fn publish(&self) {
        self.view
            .send_replace(render(&self.machine, self.resolving, self.processed));
    }
}

fn render(machine: &SearchMachine, resolving: bool, processed: u64) -> SearchView {
    SearchView {
        query: machine.query().to_string(),
        status: machine.status(),
        predictions: machine.predictions().to_vec(),
        show_no_results: machine.shows_no_results(),
        disabled: machine.is_disabled(),
        pending: machine.deadline().is_some(),
        resolving,
        processed,
    }
}
