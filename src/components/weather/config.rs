//! Tunable constants for the backdrop simulation, theming and scroll physics.
//!
//! Every struct derives `Deserialize` with `#[serde(default)]`, so a page may
//! override a single field through `<script id="weather-config">` and keep
//! the defaults for the rest.

use serde::Deserialize;

/// Particle ("mushi") simulation parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MushiConfig {
	/// Fixed pool size.
	pub particle_count: usize,
	/// Upper bound added to the minimum vertical speed at spawn.
	pub base_speed: f64,
	/// Pointer repulsion radius in canvas pixels.
	pub interaction_radius: f64,
	/// Maximum displacement per tick at the pointer's centre.
	pub push_strength: f64,
	/// Distance past the canvas edge before a particle respawns.
	pub edge_margin: f64,
	/// Fraction of `speed_y` applied when rising in clear weather.
	pub clear_rise_factor: f64,
	/// Opacity change per tick.
	pub pulse_step: f64,
	pub opacity_min: f64,
	pub opacity_max: f64,
}

impl Default for MushiConfig {
	fn default() -> Self {
		Self {
			particle_count: 120,
			base_speed: 0.8,
			interaction_radius: 150.0,
			push_strength: 8.0,
			edge_margin: 10.0,
			clear_rise_factor: 0.5,
			pulse_step: 0.01,
			opacity_min: 0.2,
			opacity_max: 0.8,
		}
	}
}

/// Day-phase resolution parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
	/// Half-width of the dawn and dusk windows around sunrise/sunset.
	pub transition_window_minutes: i64,
}

impl Default for ThemeConfig {
	fn default() -> Self {
		Self {
			transition_window_minutes: 45,
		}
	}
}

/// Drag-to-scroll and glide parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
	/// Scroll distance per pixel of pointer travel.
	pub drag_multiplier: f64,
	/// Velocity multiplier applied each glide step.
	pub decay: f64,
	/// Glide stops once `|velocity|` drops below this.
	pub min_velocity: f64,
}

impl Default for ScrollConfig {
	fn default() -> Self {
		Self {
			drag_multiplier: 1.5,
			decay: 0.92,
			min_velocity: 0.5,
		}
	}
}

/// Distance thresholds for place comparisons.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeoConfig {
	/// A place closer than this to the viewer counts as their current location.
	pub current_location_radius_km: f64,
	/// Same-named candidates closer than this are treated as duplicates.
	pub duplicate_radius_km: f64,
}

impl Default for GeoConfig {
	fn default() -> Self {
		Self {
			current_location_radius_km: 20.0,
			duplicate_radius_km: 5.0,
		}
	}
}

/// Complete widget configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
	pub mushi: MushiConfig,
	pub theme: ThemeConfig,
	pub scroll: ScrollConfig,
	pub geo: GeoConfig,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config: WidgetConfig =
			serde_json::from_str(r#"{ "mushi": { "particle_count": 40 }, "scroll": { "decay": 0.9 } }"#)
				.unwrap();
		assert_eq!(config.mushi.particle_count, 40);
		assert_eq!(config.mushi.interaction_radius, 150.0);
		assert_eq!(config.scroll.decay, 0.9);
		assert_eq!(config.scroll.drag_multiplier, 1.5);
		assert_eq!(config.theme, ThemeConfig::default());
		assert_eq!(config.geo, GeoConfig::default());
	}

	#[test]
	fn empty_object_is_default() {
		let config: WidgetConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, WidgetConfig::default());
	}
}
