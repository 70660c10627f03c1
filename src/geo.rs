//! Geo proximity
//!
//! Haversine great-circle distance and the proximity ranker shared by the
//! "nearby shops" and "nearby delivery candidates" listings. Ranking never
//! fails: entities without a complete coordinate pair are excluded and
//! counted, never defaulted to (0, 0).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mean Earth radius in kilometres, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees. Both coordinates are required
/// together; an entity that cannot produce both has no location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from degrees.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometres.
    #[must_use]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// An entity that may carry a location.
pub trait Located {
    /// The entity's location, if it has a complete coordinate pair.
    fn location(&self) -> Option<GeoPoint>;
}

impl Located for GeoPoint {
    fn location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl<T: Located> Located for &T {
    fn location(&self) -> Option<GeoPoint> {
        (*self).location()
    }
}

/// An entity that passed the radius filter, annotated with its distance from
/// the origin.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    /// The input entity.
    #[serde(flatten)]
    pub entity: T,

    /// Computed great-circle distance from the origin, in kilometres.
    pub distance_km: f64,
}

/// The result of a proximity query.
#[derive(Clone, Debug)]
pub struct Ranking<T> {
    /// Entities within the radius, nearest first. Ties keep input order.
    pub within: Vec<Ranked<T>>,

    /// How many candidates were dropped for missing coordinates. Diagnostic
    /// only; a missing location is not an error.
    pub excluded_missing_location: usize,
}

/// Filters candidates to those within `radius_km` of `origin` and orders
/// them nearest first.
///
/// The radius and origin are caller-supplied; the ranker applies no implicit
/// defaults. Empty input, or input with no survivors, yields an empty
/// ordered sequence.
pub fn rank<T: Located>(
    origin: GeoPoint,
    radius_km: f64,
    candidates: impl IntoIterator<Item = T>,
) -> Ranking<T> {
    let mut within = Vec::new();
    let mut excluded_missing_location = 0;

    for entity in candidates {
        let Some(location) = entity.location() else {
            excluded_missing_location += 1;
            continue;
        };

        let distance_km = origin.distance_km(location);
        if distance_km <= radius_km {
            within.push(Ranked {
                entity,
                distance_km,
            });
        }
    }

    // Stable sort: equidistant entities keep their input order.
    within.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    debug!(
        within = within.len(),
        excluded_missing_location, "ranked proximity candidates"
    );

    Ranking {
        within,
        excluded_missing_location,
    }
}
