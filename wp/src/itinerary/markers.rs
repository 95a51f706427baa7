//! Map marker extraction
//!
//! Flattens an enriched trip into plottable markers. Activities without
//! coordinates are skipped; options never carry coordinates so choice blocks
//! only produce a marker when the block itself was geocoded.

use serde::Serialize;

use super::model::{ActivityKind, Trip};

/// Icon class for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerIcon {
    Sight,
    Food,
    Hotel,
}

impl From<&ActivityKind> for MarkerIcon {
    fn from(kind: &ActivityKind) -> Self {
        match kind {
            ActivityKind::FoodOption => Self::Food,
            ActivityKind::HotelOption | ActivityKind::CheckIn => Self::Hotel,
            _ => Self::Sight,
        }
    }
}

impl std::fmt::Display for MarkerIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sight => write!(f, "sight"),
            Self::Food => write!(f, "food"),
            Self::Hotel => write!(f, "hotel"),
        }
    }
}

/// A plottable point extracted from a trip
#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    pub icon: MarkerIcon,
    pub day: u32,
}

/// Extract markers, optionally restricted to one day (None = all days)
pub fn map_markers(trip: &Trip, day_filter: Option<u32>) -> Vec<MapMarker> {
    let mut markers = Vec::new();

    for day in &trip.days {
        if let Some(wanted) = day_filter
            && day.day_number != wanted
        {
            continue;
        }

        for section in &day.sections {
            for activity in &section.activities {
                let Some(coords) = activity.coordinates else {
                    continue;
                };
                let label = activity
                    .place_name
                    .clone()
                    .or_else(|| activity.title.clone())
                    .unwrap_or_default();
                markers.push(MapMarker {
                    lat: coords.lat,
                    lng: coords.lng,
                    label,
                    icon: MarkerIcon::from(&activity.kind),
                    day: day.day_number,
                });
            }
        }
    }

    markers
}
