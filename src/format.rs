use crate::config::OutputPolicy;
use crate::types::LookupResult;

pub const STATUS_FOUND: &str = "FOUND";
pub const STATUS_NOT_FOUND: &str = "NOT FOUND";

impl OutputPolicy {
    /// Column header written once before any rows.
    pub fn header(self) -> &'static str {
        match self {
            OutputPolicy::All => "Hash,Status",
            OutputPolicy::IdentifiedOnly | OutputPolicy::UnidentifiedOnly => "Hash",
        }
    }
}

/// Render one result as a report row, or `None` if the policy suppresses it.
pub fn render(result: &LookupResult, policy: OutputPolicy) -> Option<String> {
    // single-column modes still carry the status field under the `Hash` header
    match (policy, result.exists) {
        (OutputPolicy::All | OutputPolicy::IdentifiedOnly, true) => {
            Some(format!("{},{}", result.hash, STATUS_FOUND))
        }
        (OutputPolicy::All | OutputPolicy::UnidentifiedOnly, false) => {
            Some(format!("{},{}", result.hash, STATUS_NOT_FOUND))
        }
        (OutputPolicy::IdentifiedOnly, false) | (OutputPolicy::UnidentifiedOnly, true) => None,
    }
}
