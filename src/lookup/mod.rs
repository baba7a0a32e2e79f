pub mod http;

use crate::batch::Batch;
use crate::error::LookupError;
use crate::types::LookupResult;
use async_trait::async_trait;
use std::collections::HashMap;

pub use http::BulkLookupClient;

/// A service that answers "is this hash known?" for a whole batch at once.
#[async_trait]
pub trait HashLookup: Send + Sync {
    /// Submit one batch and return the results in the order the server sent
    /// them. Implementations make exactly one attempt.
    async fn submit(&self, batch: &Batch) -> Result<Vec<LookupResult>, LookupError>;
}

/// Check that the server echoed back exactly the hashes in `batch`.
///
/// Results are matched by hash, never by position. Every submitted hash must
/// come back, nothing else may, and no hash may come back more often than it
/// was submitted.
pub fn reconcile(batch: &Batch, results: &[LookupResult]) -> Result<(), LookupError> {
    let mut submitted: HashMap<&str, usize> = HashMap::new();
    for record in batch.records() {
        *submitted.entry(record.as_str()).or_insert(0) += 1;
    }
    let mut echoed: HashMap<&str, usize> = HashMap::new();
    for result in results {
        *echoed.entry(result.hash.as_str()).or_insert(0) += 1;
    }

    let missing = submitted.keys().filter(|h| !echoed.contains_key(*h)).count();
    let unexpected = echoed.keys().filter(|h| !submitted.contains_key(*h)).count();
    let repeated = echoed
        .iter()
        .filter(|(h, n)| submitted.get(*h).is_some_and(|sent| *n > sent))
        .count();
    if missing == 0 && unexpected == 0 && repeated == 0 {
        return Ok(());
    }

    // First offender in a stable order, for the log line.
    let sample = batch
        .records()
        .iter()
        .map(|r| r.as_str())
        .find(|h| !echoed.contains_key(h))
        .or_else(|| {
            results.iter().map(|r| r.hash.as_str()).find(|h| {
                submitted
                    .get(h)
                    .map_or(true, |sent| echoed.get(h).is_some_and(|n| n > sent))
            })
        })
        .unwrap_or_default()
        .to_string();

    Err(LookupError::Mismatch {
        missing,
        unexpected,
        repeated,
        sample,
    })
}
