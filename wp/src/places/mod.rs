//! Place lookup services
//!
//! Two independent read-only HTTP services: Photon for geocoding and city
//! search, Wikipedia for representative place images. Both are best-effort
//! from the enricher's point of view; errors surface here and degrade to
//! None there.

mod error;
mod geocode;
mod images;

pub use error::PlacesError;
pub use geocode::{CitySuggestion, GeocodeClient};
pub use images::ImageClient;
