use serde::Deserialize;
use std::fmt;

/// One input line, passed through untouched apart from trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct HashRecord(String);

impl HashRecord {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HashRecord {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One element of the `/bulk` response array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupResult {
    pub hash: HashRecord,
    pub exists: bool,
}
