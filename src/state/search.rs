//! Query / pagination state machine.
//!
//! `SearchController` owns the active query, the page cursor, the fetch
//! state and the accumulated results. Operations never block: a call
//! that needs the network hands back a [`PendingFetch`] which the caller
//! runs and later feeds into [`SearchController::complete`]. Every fetch
//! carries a [`FetchTicket`]; a completion whose ticket is not the one
//! currently in flight belongs to a superseded query and is dropped.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::data::{Image, ImageId, SearchPage};
use super::overlay::{OverlayController, ScrollLock};
use super::results::ResultAccumulator;
use crate::notice::Notice;
use crate::service::{SearchError, SearchFuture, SearchService};

pub const EMPTY_QUERY_NOTICE: &str = "Please enter a search query!";
pub const NO_RESULTS_NOTICE: &str = "No result found for your query";
pub const FETCH_FAILED_PREFIX: &str = "Failed to fetch images: ";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Error(String),
}

/// Identifies one request: which query it was issued for, which page, and
/// whether it starts a fresh result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonic per controller, tells apart two fetches for the same query
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub fresh: bool,
}

/// A request that has been issued but not yet awaited
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: SearchFuture,
}

impl PendingFetch {
    /// Await the request, keeping its ticket alongside the result
    pub async fn run(self) -> (FetchTicket, Result<SearchPage, SearchError>) {
        let result = self.request.await;
        (self.ticket, result)
    }
}

impl fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Side effects the shell should perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notice),
    /// A further page was appended; scroll so it is visible
    RevealNewContent,
}

/// Result of driving the controller: effects plus at most one request
#[derive(Debug, Default)]
pub struct Transition {
    pub effects: Vec<Effect>,
    pub fetch: Option<PendingFetch>,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }

    fn notify(notice: Notice) -> Self {
        Self {
            effects: vec![Effect::Notify(notice)],
            fetch: None,
        }
    }
}

pub struct SearchController {
    service: Arc<dyn SearchService>,
    query: String,
    results: ResultAccumulator,
    /// Next page to request
    cursor: u32,
    exhausted: bool,
    state: FetchState,
    /// Set exactly while `state` is `Loading`
    in_flight: Option<FetchTicket>,
    generation: u64,
    overlay: OverlayController,
}

impl SearchController {
    pub fn new(service: Arc<dyn SearchService>, scroll_lock: ScrollLock) -> Self {
        Self {
            service,
            query: String::new(),
            results: ResultAccumulator::new(),
            cursor: 1,
            exhausted: false,
            state: FetchState::Idle,
            in_flight: None,
            generation: 0,
            overlay: OverlayController::new(scroll_lock),
        }
    }

    /// Start a search for `raw` (whitespace-trimmed).
    ///
    /// Blank input only produces a notice. Resubmitting the active query
    /// does nothing, unless its first page failed and nothing is shown, in
    /// which case the first page is requested again.
    pub fn submit(&mut self, raw: &str) -> Transition {
        let query = raw.trim();

        if query.is_empty() {
            debug!("rejecting blank query");
            return Transition::notify(Notice::info(EMPTY_QUERY_NOTICE));
        }

        if query == self.query {
            if self.first_page_failed() {
                info!(query, "retrying first page");
                return self.fetch(1, true);
            }
            debug!(query, "query unchanged, ignoring resubmission");
            return Transition::none();
        }

        info!(query, "starting new search");
        self.query = query.to_string();
        self.results.reset();
        self.cursor = 1;
        self.exhausted = false;
        self.state = FetchState::Idle;
        // Whatever was in flight now belongs to an old query
        self.in_flight = None;
        self.overlay.force_close();

        self.fetch(1, true)
    }

    /// Request the next page of the active query.
    ///
    /// A no-op while loading, before anything is shown, or once the
    /// results are exhausted.
    pub fn load_more(&mut self) -> Transition {
        if !self.can_load_more() {
            debug!(
                loading = self.is_loading(),
                empty = self.results.is_empty(),
                exhausted = self.exhausted,
                "load more ignored"
            );
            return Transition::none();
        }
        self.fetch(self.cursor, false)
    }

    fn fetch(&mut self, page: u32, fresh: bool) -> Transition {
        if let Some(current) = &self.in_flight {
            warn!(page, in_flight = current.page, "fetch rejected, request already in flight");
            return Transition::none();
        }

        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page,
            fresh,
        };

        debug!(query = %ticket.query, page, fresh, "issuing fetch");
        let request = self.service.search(&ticket.query, page);
        self.state = FetchState::Loading;
        self.in_flight = Some(ticket.clone());

        Transition {
            effects: Vec::new(),
            fetch: Some(PendingFetch { ticket, request }),
        }
    }

    /// Apply the outcome of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<SearchPage, SearchError>,
    ) -> Transition {
        if self.in_flight.as_ref() != Some(&ticket) {
            debug!(query = %ticket.query, page = ticket.page, "discarding stale response");
            return Transition::none();
        }
        self.in_flight = None;

        match result {
            Ok(page) => self.apply_page(&ticket, page),
            Err(error) => {
                let message = error.to_string();
                warn!(query = %ticket.query, page = ticket.page, ?error, "fetch failed");
                self.state = FetchState::Error(message.clone());
                Transition::notify(Notice::failure(format!("{FETCH_FAILED_PREFIX}{message}")))
            }
        }
    }

    fn apply_page(&mut self, ticket: &FetchTicket, page: SearchPage) -> Transition {
        self.state = FetchState::Idle;
        let received = page.images.len();

        if received == 0 && ticket.fresh {
            info!(query = %ticket.query, "no results");
            self.exhausted = true;
            return Transition::notify(Notice::info(NO_RESULTS_NOTICE));
        }

        if ticket.fresh {
            self.results.reset();
        }
        self.results.append(page.images);
        self.cursor = ticket.page + 1;
        // An empty later page means the total over-promised
        self.exhausted = received == 0 || self.results.count() >= page.total_matches;

        info!(
            query = %ticket.query,
            page = ticket.page,
            received,
            total = page.total_matches,
            accumulated = self.results.count(),
            exhausted = self.exhausted,
            "page loaded"
        );

        let mut transition = Transition::none();
        if !ticket.fresh {
            transition.effects.push(Effect::RevealNewContent);
        }
        transition
    }

    fn first_page_failed(&self) -> bool {
        matches!(self.state, FetchState::Error(_)) && self.results.is_empty() && self.cursor == 1
    }

    /// Open the overlay on an image from the current results
    pub fn open_image(&mut self, id: ImageId) -> Option<&Image> {
        let Some(image) = self.results.get(id) else {
            debug!(image_id = id, "ignoring open for unknown image");
            return None;
        };
        self.overlay.open(image.clone());
        self.overlay.current()
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn images(&self) -> &[Image] {
        self.results.as_slice()
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.results.contains(id)
    }

    #[cfg(test)]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    #[cfg(test)]
    pub fn fetch_state(&self) -> &FetchState {
        &self.state
    }

    /// Ticket of the request currently awaited, if any
    #[cfg(test)]
    pub fn in_flight(&self) -> Option<&FetchTicket> {
        self.in_flight.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the "load more" affordance should be offered
    pub fn can_load_more(&self) -> bool {
        !self.is_loading() && !self.results.is_empty() && !self.exhausted
    }
}
