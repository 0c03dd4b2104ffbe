//! Great-circle distance and place comparisons.

use super::config::GeoConfig;
use super::types::{Coordinates, Place};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points on a spherical Earth.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
	let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
	let d_lat = (b.latitude - a.latitude).to_radians();
	let d_lon = (b.longitude - a.longitude).to_radians();

	let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
	// Rounding can push h a hair outside [0, 1] for antipodal points
	let h = h.clamp(0.0, 1.0);
	2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sort candidates nearest-first when the viewer's position is known.
///
/// The sort is stable, so equally distant candidates keep the geocoder's
/// relevance order. Without a user location the order is left untouched.
pub fn rank_by_proximity(candidates: &mut [Place], user: Option<Coordinates>) {
	let Some(user) = user else {
		return;
	};
	candidates.sort_by(|a, b| {
		distance_km(a.coordinates, user).total_cmp(&distance_km(b.coordinates, user))
	});
}

/// Drop candidates that repeat an earlier name/country within `duplicate_radius_km`.
pub fn dedup_candidates(candidates: Vec<Place>, config: &GeoConfig) -> Vec<Place> {
	let mut kept: Vec<Place> = Vec::with_capacity(candidates.len());
	for candidate in candidates {
		let duplicate = kept.iter().any(|k| {
			k.name.eq_ignore_ascii_case(&candidate.name)
				&& k.country == candidate.country
				&& distance_km(k.coordinates, candidate.coordinates) < config.duplicate_radius_km
		});
		if !duplicate {
			kept.push(candidate);
		}
	}
	kept
}

/// Whether `place` is close enough to the viewer to count as "here".
///
/// A missing user location means "not my location", never an error.
pub fn is_current_location(
	place: Coordinates,
	user: Option<Coordinates>,
	config: &GeoConfig,
) -> bool {
	user.is_some_and(|u| distance_km(place, u) < config.current_location_radius_km)
}

/// Whether the place's wall clock reads the same as the viewer's.
pub fn shares_civil_time(place_offset_seconds: i32, viewer_offset_seconds: i32) -> bool {
	place_offset_seconds == viewer_offset_seconds
}
