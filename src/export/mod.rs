//! Typed view of an ActivityWatch export document.
//!  The basic idea is:
//!   - The document has a `buckets` object. Every bucket is a stream of events from one watcher.
//!   - Bucket order follows the key order of the document, which is why `serde_json` is built
//!     with `preserve_order`.
//!   - Everything inside is optional. Missing or mistyped values fall back to defaults instead of
//!     failing the whole document, see [lenient].

pub mod entities;
mod lenient;

use serde_json::Value;

pub use entities::{Bucket, Event, EventData, ExportInfo, RawExport, TimeRange};

impl RawExport {
    /// Parses raw bytes into an export. Only malformed JSON is an error. A document that is valid
    /// JSON but not an object is read as an export with no buckets.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<RawExport> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(RawExport::default()),
        }
    }

    /// Total number of events across all buckets, including the ones without data.
    pub fn event_count(&self) -> usize {
        self.buckets.iter().map(|v| v.events.len()).sum()
    }
}
