//! Day-phase and weather theming.
//!
//! The backdrop's look is a function of the place's local civil time relative
//! to that day's sunrise and sunset, plus a coarse weather category:
//!
//! | phase   | window                         | particle theme |
//! |---------|--------------------------------|----------------|
//! | Dawn    | within 45 min of sunrise       | morning        |
//! | Dusk    | within 45 min of sunset        | morning        |
//! | Day     | between sunrise and sunset     | day            |
//! | Morning | before sunrise                 | morning        |
//! | Night   | after sunset                   | night          |
//!
//! Rows are tested top to bottom; the first match wins.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, Utc};

use super::config::ThemeConfig;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Particle palette selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
	Day,
	Morning,
	#[default]
	Night,
}

/// Fill and glow for one theme. The fill's alpha is replaced per particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePalette {
	pub fill: Color,
	pub glow: Color,
}

impl Theme {
	pub const fn palette(self) -> ParticlePalette {
		match self {
			Theme::Day => ParticlePalette {
				fill: Color::rgb(255, 230, 150),
				glow: Color::rgba(255, 215, 0, 0.5),
			},
			Theme::Morning => ParticlePalette {
				fill: Color::rgb(255, 200, 200),
				glow: Color::rgba(255, 100, 100, 0.5),
			},
			Theme::Night => ParticlePalette {
				fill: Color::rgb(200, 255, 255),
				glow: Color::rgba(0, 255, 255, 0.8),
			},
		}
	}
}

/// Coarse weather classification driving particle drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeatherCategory {
	/// Particles rise slowly and respawn below the bottom edge.
	Clear,
	/// Particles fall and respawn above the top edge.
	#[default]
	Precipitating,
}

impl WeatherCategory {
	/// Classify a WMO weather code. Codes 0-3 (clear through overcast) are clear.
	pub fn from_code(code: u8) -> Self {
		if code <= 3 {
			WeatherCategory::Clear
		} else {
			WeatherCategory::Precipitating
		}
	}
}

/// Where the local clock sits relative to the sun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayPhase {
	Dawn,
	Dusk,
	Day,
	Morning,
	Night,
}

impl DayPhase {
	/// Display label for the time badge.
	pub const fn label(self) -> &'static str {
		match self {
			DayPhase::Dawn => "Dawn",
			DayPhase::Dusk => "Dusk",
			DayPhase::Day => "Day",
			DayPhase::Morning => "Morning",
			DayPhase::Night => "Night",
		}
	}

	/// Particle theme. Dusk shares the pre-dawn palette.
	pub const fn theme(self) -> Theme {
		match self {
			DayPhase::Day => Theme::Day,
			DayPhase::Dawn | DayPhase::Dusk | DayPhase::Morning => Theme::Morning,
			DayPhase::Night => Theme::Night,
		}
	}

	/// Backdrop class. Unlike [`DayPhase::theme`], dusk keeps its own class.
	pub const fn backdrop_class(self) -> &'static str {
		match self {
			DayPhase::Dusk => "theme-dusk",
			DayPhase::Day => "theme-day",
			DayPhase::Dawn | DayPhase::Morning => "theme-morning",
			DayPhase::Night => "theme-night",
		}
	}
}

impl fmt::Display for DayPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Classify `city_time` against the day's sunrise and sunset.
///
/// All three instants must be in the place's local frame.
pub fn resolve_phase(
	city_time: NaiveDateTime,
	sunrise: NaiveDateTime,
	sunset: NaiveDateTime,
	config: &ThemeConfig,
) -> DayPhase {
	// Page config may carry any i64; saturate rather than overflow
	let window =
		TimeDelta::try_minutes(config.transition_window_minutes).unwrap_or(TimeDelta::MAX);

	if (city_time - sunrise).abs() <= window {
		DayPhase::Dawn
	} else if (city_time - sunset).abs() <= window {
		DayPhase::Dusk
	} else if sunrise < city_time && city_time < sunset {
		DayPhase::Day
	} else if city_time < sunrise {
		DayPhase::Morning
	} else {
		DayPhase::Night
	}
}

/// Output of the theme resolver for one forecast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeResolution {
	pub phase: DayPhase,
	pub weather: WeatherCategory,
	/// Full daylight with a clear or mostly clear sky (codes 0 and 1).
	pub clear_day: bool,
}

impl ThemeResolution {
	pub fn resolve(
		city_time: NaiveDateTime,
		sunrise: NaiveDateTime,
		sunset: NaiveDateTime,
		weather_code: u8,
		config: &ThemeConfig,
	) -> Self {
		let phase = resolve_phase(city_time, sunrise, sunset, config);
		Self {
			phase,
			weather: WeatherCategory::from_code(weather_code),
			clear_day: phase == DayPhase::Day && weather_code <= 1,
		}
	}

	pub const fn label(&self) -> &'static str {
		self.phase.label()
	}

	/// The value the particle simulator reads each tick.
	pub const fn state(&self) -> ThemeState {
		ThemeState {
			theme: self.phase.theme(),
			weather: self.weather,
		}
	}

	/// Space-separated classes for the page backdrop.
	pub fn backdrop_classes(&self) -> String {
		let mut classes = self.phase.backdrop_class().to_string();
		if self.clear_day {
			classes.push_str(" weather-clear");
		}
		classes
	}
}

/// Theme and weather as seen by the particle simulator.
///
/// Replaced wholesale after each forecast; the default applies before the
/// first forecast arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThemeState {
	pub theme: Theme,
	pub weather: WeatherCategory,
}

/// The place's wall-clock time, derived from UTC and its offset.
///
/// Offsets outside +-24h are not representable and fall back to UTC.
pub fn local_civil_time(now_utc: DateTime<Utc>, utc_offset_seconds: i32) -> NaiveDateTime {
	let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or(Utc.fix());
	now_utc.with_timezone(&offset).naive_local()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{NaiveDate, TimeZone};

	fn at(h: u32, m: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2026, 6, 21)
			.unwrap()
			.and_hms_opt(h, m, 0)
			.unwrap()
	}

	fn resolve(h: u32, m: u32, code: u8) -> ThemeResolution {
		ThemeResolution::resolve(at(h, m), at(6, 0), at(18, 0), code, &ThemeConfig::default())
	}

	#[test]
	fn phases_for_a_six_to_six_day() {
		let dawn = resolve(6, 10, 3);
		assert_eq!(dawn.phase, DayPhase::Dawn);
		assert_eq!(dawn.state().theme, Theme::Morning);

		let noon = resolve(12, 0, 3);
		assert_eq!((noon.phase, noon.label()), (DayPhase::Day, "Day"));
		assert_eq!(noon.state().theme, Theme::Day);

		let dusk = resolve(17, 50, 3);
		assert_eq!(dusk.label(), "Dusk");
		assert_eq!(dusk.state().theme, Theme::Morning);

		let late = resolve(23, 0, 3);
		assert_eq!((late.label(), late.state().theme), ("Night", Theme::Night));

		let early = resolve(2, 0, 3);
		assert_eq!((early.label(), early.state().theme), ("Morning", Theme::Morning));
	}

	#[test]
	fn oversized_window_saturates() {
		let config = ThemeConfig {
			transition_window_minutes: i64::MAX,
		};
		assert_eq!(resolve_phase(at(12, 0), at(6, 0), at(18, 0), &config), DayPhase::Dawn);
	}

	#[test]
	fn window_edges_are_inclusive() {
		assert_eq!(resolve(5, 15, 0).phase, DayPhase::Dawn);
		assert_eq!(resolve(6, 45, 0).phase, DayPhase::Dawn);
		assert_eq!(resolve(6, 46, 0).phase, DayPhase::Day);
		assert_eq!(resolve(5, 14, 0).phase, DayPhase::Morning);
		assert_eq!(resolve(18, 45, 0).phase, DayPhase::Dusk);
		assert_eq!(resolve(18, 46, 0).phase, DayPhase::Night);
	}

	#[test]
	fn dawn_wins_when_windows_overlap() {
		let config = ThemeConfig::default();
		let phase = resolve_phase(at(12, 0), at(11, 50), at(12, 10), &config);
		assert_eq!(phase, DayPhase::Dawn);
	}

	#[test]
	fn clear_day_needs_daylight_and_code_0_or_1() {
		assert!(resolve(12, 0, 0).clear_day);
		assert!(resolve(12, 0, 1).clear_day);
		assert!(!resolve(12, 0, 2).clear_day);
		assert!(!resolve(23, 0, 0).clear_day);
		assert!(!resolve(6, 0, 0).clear_day);

		assert_eq!(resolve(12, 0, 0).backdrop_classes(), "theme-day weather-clear");
		assert_eq!(resolve(17, 50, 61).backdrop_classes(), "theme-dusk");
		assert_eq!(resolve(6, 10, 61).backdrop_classes(), "theme-morning");
	}

	#[test]
	fn weather_codes_split_at_overcast() {
		assert_eq!(WeatherCategory::from_code(0), WeatherCategory::Clear);
		assert_eq!(WeatherCategory::from_code(3), WeatherCategory::Clear);
		assert_eq!(WeatherCategory::from_code(45), WeatherCategory::Precipitating);
		assert_eq!(WeatherCategory::from_code(95), WeatherCategory::Precipitating);
	}

	#[test]
	fn default_state_is_night_precipitating() {
		let state = ThemeState::default();
		assert_eq!(state.theme, Theme::Night);
		assert_eq!(state.weather, WeatherCategory::Precipitating);
	}

	#[test]
	fn civil_time_ignores_viewer_zone() {
		let now = Utc.with_ymd_and_hms(2026, 10, 16, 22, 30, 0).unwrap();
		let next_day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
		let same_day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
		assert_eq!(local_civil_time(now, 7200), next_day.and_hms_opt(0, 30, 0).unwrap());
		assert_eq!(local_civil_time(now, -4 * 3600), same_day.and_hms_opt(18, 30, 0).unwrap());
		assert_eq!(local_civil_time(now, 200_000), now.naive_utc());
	}

	#[test]
	fn palettes_are_distinct() {
		let day = Theme::Day.palette();
		let morning = Theme::Morning.palette();
		let night = Theme::Night.palette();
		assert_ne!(day, morning);
		assert_ne!(morning, night);
		assert_eq!(night.glow.to_css(), "rgba(0, 255, 255, 0.8)");
		assert_eq!(day.fill.with_alpha(0.5).to_css(), "rgba(255, 230, 150, 0.5)");
	}
}
