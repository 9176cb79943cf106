//! Exchange-rate tables with a TTL and a stale-table fallback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use joblens_core::{Capability, Clock, RateProvider, RateTable};
use joblens_middleware::provider_call_with_timeout;

struct CachedTable {
    table: Arc<RateTable>,
    fetched: Instant,
}

/// Per-base-currency cache of rate tables in front of a [`RateProvider`].
///
/// A refresh failure never surfaces as an error: the last table for the base
/// is returned if one exists, an empty table otherwise.
pub struct ExchangeRates {
    provider: Option<Arc<dyn RateProvider>>,
    ttl: Duration,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    tables: Mutex<HashMap<String, CachedTable>>,
}

impl ExchangeRates {
    /// Create the service. Without a provider every lookup yields an empty table.
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn RateProvider>>,
        ttl: Duration,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            ttl,
            timeout,
            clock,
            tables: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, base: &str) -> Option<(Arc<RateTable>, bool)> {
        let now = self.clock.now();
        let guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(base).map(|c| {
            let fresh = now.saturating_duration_since(c.fetched) < self.ttl;
            (Arc::clone(&c.table), fresh)
        })
    }

    /// Current table for `base` (case-insensitive).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "joblens::rates::get_rates", skip(self))
    )]
    pub async fn get_rates(&self, base: &str) -> Arc<RateTable> {
        let base = base.trim().to_ascii_uppercase();
        if let Some((table, true)) = self.cached(&base) {
            return table;
        }
        let Some(provider) = self.provider.as_ref() else {
            return Arc::new(RateTable::empty(base));
        };

        let started = self.clock.now();
        let fetched = provider_call_with_timeout(
            provider.name(),
            Capability::Rates,
            self.timeout,
            provider.latest(&base),
        )
        .await;

        match fetched {
            Ok(table) => {
                let table = Arc::new(table);
                let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
                // a concurrent refresh may have finished first; keep the most recent one
                let newer = guard
                    .get(&base)
                    .filter(|c| c.fetched > started)
                    .map(|c| Arc::clone(&c.table));
                if let Some(newer) = newer {
                    return newer;
                }
                guard.insert(
                    base,
                    CachedTable {
                        table: Arc::clone(&table),
                        fetched: started,
                    },
                );
                table
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, base = %base, "exchange rate refresh failed");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
                self.cached(&base)
                    .map_or_else(|| Arc::new(RateTable::empty(base)), |(stale, _)| stale)
            }
        }
    }
}
