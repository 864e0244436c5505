use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tracing::debug;

use crate::{
    Config,
    gate::RequestGate,
    provider::PlaceLookup,
    search::{MIN_QUERY_CHARS, SearchOutcome, SuggestionEngine},
};

/// Debounced, last-query-wins autocomplete for one search box.
///
/// Call [`SearchSession::search`] on every edit of the input. Only the most
/// recently issued call ever yields suggestions; every earlier call resolves
/// to `None`, whether it was still waiting out the quiet period or its lookup
/// came back late.
#[derive(Debug)]
pub struct SearchSession {
    engine: SuggestionEngine,
    gate: RequestGate,
    query: Mutex<String>,
    debounce: Duration,
    limit: usize,
}

impl SearchSession {
    pub fn new(engine: SuggestionEngine, debounce: Duration, limit: usize) -> Self {
        Self {
            engine,
            gate: RequestGate::new(),
            query: Mutex::new(String::new()),
            debounce,
            limit,
        }
    }

    pub fn from_config(places: Arc<dyn PlaceLookup>, config: &Config) -> Self {
        let engine = SuggestionEngine::new(places);
        Self::new(engine, config.search_debounce(), config.search_limit)
    }

    /// The input changed to `query`.
    ///
    /// Returns `None` if a newer edit or an external value superseded this one.
    pub async fn search(&self, query: &str) -> Option<SearchOutcome> {
        self.set_query(query);
        let ticket = self.gate.issue();

        if query.trim().chars().count() < MIN_QUERY_CHARS {
            self.gate.settle(ticket);
            return Some(SearchOutcome::Matches(Vec::new()));
        }

        tokio::time::sleep(self.debounce).await;
        if !self.gate.is_current(ticket) {
            debug!(query, "superseded before lookup");
            return None;
        }

        let outcome = self.engine.suggest(query, self.limit).await;
        if self.gate.settle(ticket) {
            Some(outcome)
        } else {
            debug!(query, "dropping stale suggestions");
            None
        }
    }

    /// The input was set from outside, e.g. by picking a suggestion.
    ///
    /// Any in-flight search is abandoned so it cannot overwrite the value.
    pub fn set_query_external(&self, value: &str) {
        self.set_query(value);
        self.gate.cancel();
    }

    pub fn current_query(&self) -> String {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True while a search is waiting on its debounce or lookup.
    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    fn set_query(&self, value: &str) {
        let mut query = self.query.lock().unwrap_or_else(PoisonError::into_inner);
        query.clear();
        query.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::WeatherError,
        model::PlaceCandidate,
        search::tests::{PoolLookup, place},
    };
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use tokio::time::sleep;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn session(lookup: Arc<dyn PlaceLookup>) -> SearchSession {
        SearchSession::new(SuggestionEngine::new(lookup), DEBOUNCE, 5)
    }

    fn city_pool() -> Vec<PlaceCandidate> {
        vec![
            place("London", "GB", None),
            place("Paris", "FR", None),
            place("Parma", "IT", None),
        ]
    }

    /// Answers "Lon" slowly and everything else immediately.
    #[derive(Debug)]
    struct SlowLon;

    #[async_trait]
    impl PlaceLookup for SlowLon {
        async fn lookup(
            &self,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<PlaceCandidate>, WeatherError> {
            if query == "Lon" {
                sleep(Duration::from_secs(1)).await;
            }
            Ok(city_pool())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn newer_keystroke_cancels_debounced_request() {
        let lookup = Arc::new(PoolLookup {
            pool: city_pool(),
            ..Default::default()
        });
        let session = session(lookup.clone());

        let (lon, par) = tokio::join!(session.search("Lon"), async {
            sleep(Duration::from_millis(100)).await;
            session.search("Par").await
        });

        assert_eq!(lon, None);
        let par = par.expect("latest query must resolve");
        let names: Vec<_> = par.places().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Paris", "Parma"]);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.queries.lock().unwrap().as_slice(), ["Par"]);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_old_query_is_dropped() {
        let session = session(Arc::new(SlowLon));

        let (lon, par) = tokio::join!(session.search("Lon"), async {
            // "Lon" is past its debounce and waiting on the lookup
            sleep(Duration::from_millis(500)).await;
            session.search("Par").await
        });

        assert_eq!(lon, None);
        let par = par.expect("latest query must resolve");
        assert_eq!(par.places()[0].name, "Paris");
        assert!(!session.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_search_returns_suggestions() {
        let lookup = Arc::new(PoolLookup {
            pool: city_pool(),
            ..Default::default()
        });
        let session = session(lookup);

        let outcome = session
            .search("lon")
            .await
            .expect("only query must resolve");

        assert_eq!(outcome.places().len(), 1);
        assert_eq!(session.current_query(), "lon");
        assert!(!session.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn pending_while_debouncing() {
        let session = session(Arc::new(PoolLookup {
            pool: city_pool(),
            ..Default::default()
        }));

        let (outcome, was_pending) = tokio::join!(session.search("Paris"), async {
            sleep(Duration::from_millis(50)).await;
            session.is_pending()
        });

        assert!(was_pending);
        assert!(outcome.is_some());
        assert!(!session.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn picking_a_suggestion_discards_in_flight_search() {
        let session = session(Arc::new(SlowLon));

        let (lon, ()) = tokio::join!(session.search("Lon"), async {
            sleep(Duration::from_millis(400)).await;
            session.set_query_external("London, GB");
        });

        assert_eq!(lon, None);
        assert_eq!(session.current_query(), "London, GB");
        assert!(!session.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_clears_without_lookup() {
        let lookup = Arc::new(PoolLookup {
            pool: city_pool(),
            ..Default::default()
        });
        let session = session(lookup.clone());

        let (lon, cleared) = tokio::join!(session.search("Lon"), async {
            sleep(Duration::from_millis(100)).await;
            session.search("L").await
        });

        assert_eq!(lon, None);
        assert_eq!(cleared, Some(SearchOutcome::Matches(Vec::new())));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_session_uses_limit_and_debounce() {
        let pool = vec![
            place("Paris", "FR", None),
            place("Parma", "IT", None),
            place("Paray", "FR", None),
        ];
        let config = Config {
            search_limit: 2,
            ..Config::default()
        };
        let lookup = Arc::new(PoolLookup {
            pool,
            ..Default::default()
        });
        let session = SearchSession::from_config(lookup, &config);

        let started = tokio::time::Instant::now();
        let outcome = session
            .search("Par")
            .await
            .expect("only query must resolve");

        assert_eq!(outcome.places().len(), 2);
        assert!(started.elapsed() >= config.search_debounce());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_lookup_surfaces_as_failed_outcome() {
        let session = session(Arc::new(PoolLookup {
            fail: true,
            ..Default::default()
        }));

        let outcome = session.search("Paris").await;

        assert_eq!(outcome, Some(SearchOutcome::Failed));
    }
}
