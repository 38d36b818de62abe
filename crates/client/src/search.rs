//! Debounced autocomplete over [`SigaClient::search`].

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use siga_cache::MemoryCache;
use siga_config::SearchConfig;
use siga_traits::{Cache, Transport};
use siga_transport::JsonpTransport;
use siga_types::{Ejecutora, SearchResponse};
use tokio::sync::watch;

use crate::api::SigaClient;

const SEARCH_FAILED: &str = "Error al buscar";

/// What the suggestion list should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing typed.
    Idle,
    /// Input shorter than the minimum; no request is made.
    TooShort { min_chars: usize },
    /// A search for `term` is scheduled or in flight.
    Loading { term: String },
    /// Matching executing units.
    Suggestions(Vec<Ejecutora>),
    /// The search succeeded with no rows.
    NoResults,
    /// The search failed; the message is ready to display.
    Failed(String),
    /// A suggestion was picked.
    Selected(Ejecutora),
}

#[derive(Debug, Default)]
struct Relevance {
    generation: u64,
    relevant: bool,
}

/// Autocomplete session for the executing unit field.
///
/// Every call to [`input`](Self::input) or [`select`](Self::select) starts a
/// new generation. A search only runs if its generation is still current when
/// the quiet period ends, and its result is only applied if the generation is
/// still current and the session still wants results when it arrives. Requests
/// already on the wire are left to finish; their results are dropped.
#[derive(Debug)]
pub struct SearchSession<T = JsonpTransport, C = MemoryCache> {
    client: Arc<SigaClient<T, C>>,
    debounce: Duration,
    min_chars: usize,
    relevance: Arc<Mutex<Relevance>>,
    state: Arc<watch::Sender<SearchState>>,
}

impl<T: Transport, C: Cache> SearchSession<T, C> {
    /// Session over `client` using the debounce and minimum length of `config`.
    pub fn new(client: Arc<SigaClient<T, C>>, config: &SearchConfig) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            client,
            debounce: config.debounce(),
            min_chars: config.min_chars,
            relevance: Arc::default(),
            state: Arc::new(state),
        }
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Feed the current text of the input.
    pub fn input(&self, text: &str) {
        let term = text.trim();
        let mut relevance = lock(&self.relevance);
        relevance.generation += 1;

        if term.is_empty() {
            relevance.relevant = false;
            self.state.send_replace(SearchState::Idle);
            return;
        }

        relevance.relevant = true;
        if term.chars().count() < self.min_chars {
            self.state.send_replace(SearchState::TooShort { min_chars: self.min_chars });
            return;
        }

        let generation = relevance.generation;
        self.state.send_replace(SearchState::Loading { term: term.to_string() });
        drop(relevance);
        self.schedule(term.to_string(), generation);
    }

    /// Pick a suggestion; pending and in-flight searches are discarded.
    pub fn select(&self, ejecutora: Ejecutora) {
        let mut relevance = lock(&self.relevance);
        relevance.generation += 1;
        relevance.relevant = false;
        debug!(codigo = %ejecutora.codigo, "ejecutora selected");
        self.state.send_replace(SearchState::Selected(ejecutora));
    }

    /// The picked suggestion, if the last action was a selection.
    pub fn selected(&self) -> Option<Ejecutora> {
        match &*self.state.borrow() {
            SearchState::Selected(ejecutora) => Some(ejecutora.clone()),
            _ => None,
        }
    }

    fn schedule(&self, term: String, generation: u64) {
        let client = Arc::clone(&self.client);
        let relevance = Arc::clone(&self.relevance);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if lock(&relevance).generation != generation {
                trace!(%term, "search superseded before it ran");
                return;
            }

            let response = client.search(&term).await;

            let current = lock(&relevance);
            if current.generation != generation || !current.relevant {
                debug!(%term, "discarding late search results");
                return;
            }
            state.send_replace(outcome_state(response));
        });
    }
}

fn outcome_state(response: SearchResponse) -> SearchState {
    match response {
        SearchResponse { success: false, message, .. } => {
            SearchState::Failed(message.unwrap_or_else(|| SEARCH_FAILED.to_string()))
        }
        SearchResponse { resultados, .. } if resultados.is_empty() => SearchState::NoResults,
        SearchResponse { resultados, .. } => SearchState::Suggestions(resultados),
    }
}

fn lock(relevance: &Mutex<Relevance>) -> MutexGuard<'_, Relevance> {
    relevance.lock().unwrap_or_else(PoisonError::into_inner)
}
