//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Itinerary generation prompt
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => Some(ITINERARY),
        _ => None,
    }
}
