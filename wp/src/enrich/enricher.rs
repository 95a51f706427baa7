//! Enrichment fan-out over a generated trip
//!
//! Walks the itinerary tree and resolves missing coordinates and images.
//! Days fan out concurrently; activities within a day run in order; the
//! lookups for one activity (coordinates, image, option images) run
//! concurrently. Everything is fill-if-missing and best-effort: a failed
//! lookup logs at debug level and leaves the field None. Enrichment never
//! fails the trip.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use futures::future::join_all;
use tracing::{debug, info};

use crate::itinerary::{Activity, ActivityOption, Day, Trip};
use crate::places::{GeocodeClient, ImageClient};

/// Counters from one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOutcome {
    /// Coordinates filled in
    pub coords_resolved: u32,
    /// Activity and option images filled in
    pub images_resolved: u32,
    /// Lookups that errored (not lookups that found nothing)
    pub lookups_failed: u32,
}

#[derive(Default)]
struct Counters {
    coords: AtomicU32,
    images: AtomicU32,
    failed: AtomicU32,
}

impl Counters {
    fn snapshot(&self) -> EnrichOutcome {
        EnrichOutcome {
            coords_resolved: self.coords.load(Ordering::Relaxed),
            images_resolved: self.images.load(Ordering::Relaxed),
            lookups_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Resolves missing coordinates and images across an itinerary tree
pub struct Enricher {
    geocode: Arc<GeocodeClient>,
    images: Arc<ImageClient>,
}

impl Enricher {
    pub fn new(geocode: Arc<GeocodeClient>, images: Arc<ImageClient>) -> Self {
        Self { geocode, images }
    }

    /// Enrich a trip, returning the same-shaped tree plus outcome counters
    pub async fn enrich(&self, trip: Trip) -> (Trip, EnrichOutcome) {
        debug!(trip_name = %trip.trip_name, day_count = trip.days.len(), "enrich: called");
        let counters = Counters::default();

        let days = join_all(trip.days.into_iter().map(|day| self.enrich_day(day, &counters))).await;

        let outcome = counters.snapshot();
        info!(
            coords = outcome.coords_resolved,
            images = outcome.images_resolved,
            failed = outcome.lookups_failed,
            "enrich: complete"
        );
        (Trip { days, ..trip }, outcome)
    }

    async fn enrich_day(&self, mut day: Day, counters: &Counters) -> Day {
        let mut sections = Vec::with_capacity(day.sections.len());
        for mut section in std::mem::take(&mut day.sections) {
            let mut activities = Vec::with_capacity(section.activities.len());
            for activity in std::mem::take(&mut section.activities) {
                activities.push(self.enrich_activity(activity, counters).await);
            }
            section.activities = activities;
            sections.push(section);
        }
        day.sections = sections;
        day
    }

    async fn enrich_activity(&self, mut activity: Activity, counters: &Counters) -> Activity {
        let options = activity.options.take();

        let coords_fut = async {
            if activity.coordinates.is_none()
                && let Some(place) = activity.place_name.as_deref()
            {
                match self.geocode.coordinates(place).await {
                    Ok(coords) => {
                        if coords.is_some() {
                            counters.coords.fetch_add(1, Ordering::Relaxed);
                        }
                        coords
                    }
                    Err(e) => {
                        debug!(place, error = %e, "enrich_activity: geocode lookup failed");
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        None
                    }
                }
            } else {
                activity.coordinates
            }
        };

        let image_fut = async {
            if activity.image_url.is_some() {
                activity.image_url.clone()
            } else if let Some(query) = activity.image_query() {
                match self.images.image_url(query).await {
                    Ok(url) => {
                        if url.is_some() {
                            counters.images.fetch_add(1, Ordering::Relaxed);
                        }
                        url
                    }
                    Err(e) => {
                        debug!(query, error = %e, "enrich_activity: image lookup failed");
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        None
                    }
                }
            } else {
                None
            }
        };

        let options_fut = async {
            match options {
                Some(opts) => {
                    Some(join_all(opts.into_iter().map(|opt| self.enrich_option(opt, counters))).await)
                }
                None => None,
            }
        };

        let (coords, image, options) = tokio::join!(coords_fut, image_fut, options_fut);

        activity.coordinates = coords;
        activity.image_url = image;
        activity.options = options;
        activity
    }

    async fn enrich_option(&self, mut option: ActivityOption, counters: &Counters) -> ActivityOption {
        if option.image_url.is_none() {
            match self.images.image_url(&option.name).await {
                Ok(url) => {
                    if url.is_some() {
                        counters.images.fetch_add(1, Ordering::Relaxed);
                    }
                    option.image_url = url;
                }
                Err(e) => {
                    debug!(name = %option.name, error = %e, "enrich_option: image lookup failed");
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        option
    }
}
