//! Display-ready values derived from a forecast snapshot.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use super::config::{GeoConfig, WidgetConfig};
use super::geo;
use super::theme::{ThemeResolution, WeatherCategory, local_civil_time};
use super::types::{CurrentConditions, DailyOutlook, ForecastSnapshot, HourlyBucket, Place};

/// Human description and drift category for a WMO weather code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeatherCondition {
	pub description: &'static str,
	pub category: WeatherCategory,
}

impl WeatherCondition {
	pub fn from_code(code: u8) -> Self {
		let description = match code {
			0 => "Clear Sky",
			1..=3 => "Partly Cloudy",
			4..=48 => "Fog",
			49..=67 => "Rain",
			68..=77 => "Snow",
			78..=82 => "Heavy Rain",
			_ => "Thunderstorm",
		};
		Self {
			description,
			category: WeatherCategory::from_code(code),
		}
	}
}

/// Icon key for a weather code; clear and partly cloudy skies vary by day/night.
pub fn icon_key(code: u8, is_day: bool) -> &'static str {
	match code {
		0 if is_day => "sun",
		0 => "moon",
		1..=3 if is_day => "cloud-sun",
		1..=3 => "cloud-moon",
		4..=48 => "cloud-fog",
		49..=67 => "cloud-rain",
		68..=77 => "snowflake",
		91.. => "cloud-lightning",
		_ => "cloud",
	}
}

/// Eight-point compass direction for a bearing in degrees.
pub fn compass_direction(degrees: f64) -> &'static str {
	const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
	let index = ((degrees / 45.0).round() as i64).rem_euclid(8);
	DIRECTIONS[index as usize]
}

/// US AQI band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirQuality {
	Good,
	Moderate,
	Unhealthy,
}

impl AirQuality {
	pub fn from_us_aqi(aqi: u16) -> Self {
		match aqi {
			0..=50 => AirQuality::Good,
			51..=100 => AirQuality::Moderate,
			_ => AirQuality::Unhealthy,
		}
	}

	pub const fn label(self) -> &'static str {
		match self {
			AirQuality::Good => "Good",
			AirQuality::Moderate => "Moderate",
			AirQuality::Unhealthy => "Unhealthy",
		}
	}

	pub const fn css_class(self) -> &'static str {
		match self {
			AirQuality::Good => "aqi-good",
			AirQuality::Moderate => "aqi-fair",
			AirQuality::Unhealthy => "aqi-poor",
		}
	}
}

/// One entry of the horizontal hours strip.
#[derive(Clone, Debug, PartialEq)]
pub struct HourSlot {
	pub label: String,
	pub is_now: bool,
	pub icon: &'static str,
	pub temperature: i64,
}

/// One entry of the vertical days strip.
#[derive(Clone, Debug, PartialEq)]
pub struct DaySlot {
	pub label: String,
	pub icon: &'static str,
	pub high: i64,
	pub low: i64,
}

/// Whether the current-hour bucket may read "Now".
///
/// Either signal is enough: the place is where the viewer is, or its clock
/// reads the same as the viewer's.
pub fn now_label_unlocked(
	snapshot: &ForecastSnapshot,
	viewer_utc_offset_seconds: i32,
	config: &GeoConfig,
) -> bool {
	geo::is_current_location(snapshot.place.coordinates, snapshot.user_location, config)
		|| geo::shares_civil_time(snapshot.utc_offset_seconds, viewer_utc_offset_seconds)
}

/// Buckets from the city's current hour to the end of its day.
pub fn hourly_strip(hourly: &[HourlyBucket], city_time: NaiveDateTime, show_now: bool) -> Vec<HourSlot> {
	let today = city_time.date();
	let current_hour = city_time.hour();

	hourly
		.iter()
		.filter(|b| b.time.date() == today && b.time.hour() >= current_hour)
		.map(|b| {
			let is_now = b.time.hour() == current_hour;
			let label = if is_now && show_now {
				"Now".to_string()
			} else {
				format!("{}:00", b.time.hour())
			};
			HourSlot {
				label,
				is_now,
				icon: icon_key(b.weather_code, b.is_day),
				temperature: b.temperature.round() as i64,
			}
		})
		.collect()
}

/// Daily entries, with the city's current date labelled "Today".
pub fn daily_strip(daily: &[DailyOutlook], city_time: NaiveDateTime) -> Vec<DaySlot> {
	daily
		.iter()
		.map(|d| DaySlot {
			label: if d.date == city_time.date() {
				"Today".to_string()
			} else {
				d.date.weekday().to_string()
			},
			icon: icon_key(d.weather_code, true),
			high: d.temperature_max.round() as i64,
			low: d.temperature_min.round() as i64,
		})
		.collect()
}

/// Long date in the city's frame, e.g. "Friday 16 Oct".
pub fn date_display(city_time: NaiveDateTime) -> String {
	city_time.format("%A %-d %b").to_string()
}

/// Readouts of the collapsible details panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastDetails {
	/// Reported index, or "Low" when the provider omits it.
	pub uv_index: String,
	/// Kilometres, one decimal.
	pub visibility_km: String,
	pub wind_gusts: i64,
	pub wind_direction: &'static str,
	pub dew_point: i64,
	pub pressure: i64,
	pub cloud_cover: i64,
	pub day_high: i64,
	pub night_low: i64,
	/// Percent, or "--" when unknown.
	pub precipitation_probability: String,
	/// Millimetres.
	pub precipitation_sum: f64,
}

impl ForecastDetails {
	pub fn derive(current: &CurrentConditions, today: &DailyOutlook) -> Self {
		Self {
			uv_index: current
				.uv_index
				.map_or_else(|| "Low".to_string(), |uv| uv.to_string()),
			visibility_km: format!("{:.1}", current.visibility / 1000.0),
			wind_gusts: current.wind_gusts.round() as i64,
			wind_direction: compass_direction(current.wind_direction),
			dew_point: current.dew_point.round() as i64,
			pressure: current.surface_pressure.round() as i64,
			cloud_cover: current.cloud_cover.round() as i64,
			day_high: today.temperature_max.round() as i64,
			night_low: today.temperature_min.round() as i64,
			precipitation_probability: today
				.precipitation_probability_max
				.map_or_else(|| "--".to_string(), |p| (p.round() as i64).to_string()),
			precipitation_sum: today.precipitation_sum,
		}
	}
}

/// Other geocoder matches worth offering, nearest first.
///
/// Candidates repeating the resolved place (or each other) within the
/// duplicate radius are dropped before ranking.
pub fn other_matches(snapshot: &ForecastSnapshot, config: &GeoConfig) -> Vec<Place> {
	let pool = std::iter::once(snapshot.place.clone())
		.chain(snapshot.candidates.iter().cloned())
		.collect();
	// The resolved place is always kept first
	let mut others: Vec<Place> = geo::dedup_candidates(pool, config).into_iter().skip(1).collect();
	geo::rank_by_proximity(&mut others, snapshot.user_location);
	others
}

/// Everything the forecast card shows, resolved for one moment.
#[derive(Clone, Debug)]
pub struct ForecastView {
	pub place: String,
	/// Admin area and country, see [`Place::region_label`].
	pub region: String,
	pub city_time: NaiveDateTime,
	pub date: String,
	pub resolution: ThemeResolution,
	pub condition: WeatherCondition,
	pub temperature: i64,
	pub feels_like: i64,
	pub humidity: i64,
	pub wind_speed: i64,
	pub wind_direction: &'static str,
	pub air_quality: Option<(u16, AirQuality)>,
	pub hours: Vec<HourSlot>,
	pub days: Vec<DaySlot>,
	pub details: ForecastDetails,
	pub other_matches: Vec<Place>,
}

impl ForecastView {
	/// Resolve a snapshot at `now_utc`. Returns `None` without a daily outlook,
	/// since the theme needs today's sunrise and sunset.
	pub fn build(
		snapshot: &ForecastSnapshot,
		now_utc: DateTime<Utc>,
		viewer_utc_offset_seconds: i32,
		config: &WidgetConfig,
	) -> Option<Self> {
		let today = snapshot.today()?;
		let city_time = local_civil_time(now_utc, snapshot.utc_offset_seconds);
		let current = &snapshot.current;
		let resolution = ThemeResolution::resolve(
			city_time,
			today.sunrise,
			today.sunset,
			current.weather_code,
			&config.theme,
		);
		let show_now = now_label_unlocked(snapshot, viewer_utc_offset_seconds, &config.geo);

		Some(Self {
			place: snapshot.place.name.clone(),
			region: snapshot.place.region_label(),
			city_time,
			date: date_display(city_time),
			resolution,
			condition: WeatherCondition::from_code(current.weather_code),
			temperature: current.temperature.round() as i64,
			feels_like: current.apparent_temperature.round() as i64,
			humidity: current.relative_humidity.round() as i64,
			wind_speed: current.wind_speed.round() as i64,
			wind_direction: compass_direction(current.wind_direction),
			air_quality: snapshot.us_aqi.map(|aqi| (aqi, AirQuality::from_us_aqi(aqi))),
			hours: hourly_strip(&snapshot.hourly, city_time, show_now),
			days: daily_strip(&snapshot.daily, city_time),
			details: ForecastDetails::derive(current, today),
			other_matches: other_matches(snapshot, &config.geo),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::weather::types::Coordinates;
	use crate::components::weather::theme::{DayPhase, Theme};
	use chrono::{NaiveDate, TimeZone};

	fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2026, 10, day)
			.unwrap()
			.and_hms_opt(h, m, 0)
			.unwrap()
	}

	fn buckets() -> Vec<HourlyBucket> {
		(0..48)
			.map(|i| HourlyBucket {
				time: at(16 + i / 24, i % 24, 0),
				temperature: 10.0 + i as f64 * 0.4,
				weather_code: if i % 24 < 6 { 0 } else { 61 },
				is_day: (6..19).contains(&(i % 24)),
			})
			.collect()
	}

	fn snapshot(user_location: Option<Coordinates>) -> ForecastSnapshot {
		ForecastSnapshot {
			place: Place {
				name: "Cape Town".into(),
				country: "South Africa".into(),
				admin: None,
				coordinates: Coordinates::new(-33.9249, 18.4241),
			},
			utc_offset_seconds: 7200,
			current: CurrentConditions::default(),
			hourly: Vec::new(),
			daily: Vec::new(),
			us_aqi: None,
			user_location,
			candidates: Vec::new(),
		}
	}

	#[test]
	fn conditions_by_code() {
		assert_eq!(WeatherCondition::from_code(0).description, "Clear Sky");
		assert_eq!(WeatherCondition::from_code(2).category, WeatherCategory::Clear);
		assert_eq!(WeatherCondition::from_code(45).description, "Fog");
		assert_eq!(WeatherCondition::from_code(45).category, WeatherCategory::Precipitating);
		assert_eq!(WeatherCondition::from_code(63).description, "Rain");
		assert_eq!(WeatherCondition::from_code(75).description, "Snow");
		assert_eq!(WeatherCondition::from_code(81).description, "Heavy Rain");
		assert_eq!(WeatherCondition::from_code(95).description, "Thunderstorm");
	}

	#[test]
	fn icons_depend_on_daylight_only_for_clear_skies() {
		assert_eq!(icon_key(0, true), "sun");
		assert_eq!(icon_key(0, false), "moon");
		assert_eq!(icon_key(2, false), "cloud-moon");
		assert_eq!(icon_key(61, false), "cloud-rain");
		assert_eq!(icon_key(85, true), "cloud");
		assert_eq!(icon_key(95, true), "cloud-lightning");
	}

	#[test]
	fn compass_rounds_to_nearest_point() {
		assert_eq!(compass_direction(0.0), "N");
		assert_eq!(compass_direction(22.4), "N");
		assert_eq!(compass_direction(22.6), "NE");
		assert_eq!(compass_direction(180.0), "S");
		assert_eq!(compass_direction(350.0), "N");
		assert_eq!(compass_direction(-90.0), "W");
	}

	#[test]
	fn aqi_bands() {
		assert_eq!(AirQuality::from_us_aqi(50), AirQuality::Good);
		assert_eq!(AirQuality::from_us_aqi(51).label(), "Moderate");
		assert_eq!(AirQuality::from_us_aqi(101).css_class(), "aqi-poor");
	}

	#[test]
	fn hourly_strip_runs_to_midnight() {
		let slots = hourly_strip(&buckets(), at(16, 20, 35), true);
		let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
		assert_eq!(labels, ["Now", "21:00", "22:00", "23:00"]);
		assert!(slots[0].is_now);
		assert_eq!(slots[0].temperature, 18);

		let locked = hourly_strip(&buckets(), at(16, 20, 35), false);
		assert_eq!(locked[0].label, "20:00");
		assert!(locked[0].is_now);
	}

	#[test]
	fn hourly_strip_uses_the_city_date() {
		let slots = hourly_strip(&buckets(), at(17, 22, 0), true);
		assert_eq!(slots.len(), 2);
		assert_eq!(slots[0].temperature, (10.0f64 + 46.0 * 0.4).round() as i64);
	}

	#[test]
	fn now_label_from_either_signal() {
		let config = GeoConfig::default();
		let nearby = Some(Coordinates::new(-33.95, 18.47));
		assert!(now_label_unlocked(&snapshot(nearby), 0, &config));
		assert!(now_label_unlocked(&snapshot(None), 7200, &config));
		assert!(!now_label_unlocked(&snapshot(None), 3600, &config));
		let far = Some(Coordinates::new(51.5, -0.12));
		assert!(!now_label_unlocked(&snapshot(far), 3600, &config));
	}

	#[test]
	fn date_and_day_labels() {
		assert_eq!(date_display(at(16, 9, 0)), "Friday 16 Oct");
		let daily = vec![DailyOutlook {
			date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
			sunrise: at(17, 6, 0),
			sunset: at(17, 19, 0),
			weather_code: 3,
			temperature_max: 21.6,
			temperature_min: 11.2,
			precipitation_probability_max: None,
			precipitation_sum: 0.0,
		}];
		let days = daily_strip(&daily, at(16, 9, 0));
		assert_eq!(days[0].label, "Sat");
		assert_eq!((days[0].high, days[0].low), (22, 11));
		assert_eq!(daily_strip(&daily, at(17, 9, 0))[0].label, "Today");
	}

	#[test]
	fn view_resolves_in_the_city_frame() {
		let mut snap = snapshot(None);
		snap.current.weather_code = 0;
		snap.current.temperature = 23.6;
		snap.current.wind_direction = 200.0;
		snap.us_aqi = Some(64);
		snap.hourly = buckets();
		snap.daily = vec![DailyOutlook {
			date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
			sunrise: at(16, 6, 0),
			sunset: at(16, 19, 0),
			weather_code: 0,
			temperature_max: 25.0,
			temperature_min: 13.0,
			precipitation_probability_max: Some(5.0),
			precipitation_sum: 0.0,
		}];

		// 10:00 UTC is noon in Cape Town
		let now = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
		let view = ForecastView::build(&snap, now, 7200, &WidgetConfig::default()).unwrap();
		assert_eq!(view.city_time, at(16, 12, 0));
		assert_eq!(view.resolution.phase, DayPhase::Day);
		assert_eq!(view.resolution.state().theme, Theme::Day);
		assert!(view.resolution.clear_day);
		assert_eq!(view.temperature, 24);
		assert_eq!(view.wind_direction, "S");
		assert_eq!(view.air_quality, Some((64, AirQuality::Moderate)));
		assert_eq!(view.hours.len(), 12);
		assert_eq!(view.hours[0].label, "Now");
		assert_eq!(view.days[0].label, "Today");
		assert_eq!(view.date, "Friday 16 Oct");
		assert_eq!(view.region, "South Africa");
		assert_eq!((view.details.day_high, view.details.night_low), (25, 13));
		assert!(view.other_matches.is_empty());
	}

	fn outlook() -> DailyOutlook {
		DailyOutlook {
			date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
			sunrise: at(16, 6, 0),
			sunset: at(16, 19, 0),
			weather_code: 61,
			temperature_max: 18.5,
			temperature_min: 9.4,
			precipitation_probability_max: Some(72.0),
			precipitation_sum: 4.2,
		}
	}

	#[test]
	fn details_round_and_convert() {
		let current = CurrentConditions {
			wind_gusts: 41.6,
			wind_direction: 310.0,
			dew_point: 7.5,
			surface_pressure: 1012.4,
			cloud_cover: 88.0,
			visibility: 24_140.0,
			uv_index: Some(3.5),
			..CurrentConditions::default()
		};
		let details = ForecastDetails::derive(&current, &outlook());
		assert_eq!(details.uv_index, "3.5");
		assert_eq!(details.visibility_km, "24.1");
		assert_eq!(details.wind_gusts, 42);
		assert_eq!(details.wind_direction, "NW");
		assert_eq!(details.dew_point, 8);
		assert_eq!(details.pressure, 1012);
		assert_eq!(details.cloud_cover, 88);
		assert_eq!((details.day_high, details.night_low), (19, 9));
		assert_eq!(details.precipitation_probability, "72");
		assert_eq!(details.precipitation_sum, 4.2);
	}

	#[test]
	fn details_fall_back_when_fields_are_missing() {
		let mut today = outlook();
		today.precipitation_probability_max = None;
		let details = ForecastDetails::derive(&CurrentConditions::default(), &today);
		assert_eq!(details.uv_index, "Low");
		assert_eq!(details.visibility_km, "0.0");
		assert_eq!(details.precipitation_probability, "--");
	}

	fn candidate(name: &str, admin: &str, lat: f64, lon: f64) -> Place {
		Place {
			name: name.into(),
			country: "South Africa".into(),
			admin: Some(admin.into()),
			coordinates: Coordinates::new(lat, lon),
		}
	}

	#[test]
	fn other_matches_drop_repeats_and_rank_by_distance() {
		// Viewer in Johannesburg
		let mut snap = snapshot(Some(Coordinates::new(-26.2, 28.05)));
		snap.candidates = vec![
			candidate("Cape Town", "Western Cape", -33.93, 18.43),
			candidate("Capetown", "Western Cape", -33.6, 26.9),
			candidate("Cape Town", "Gauteng", -26.1, 28.0),
		];
		let names: Vec<_> = other_matches(&snap, &GeoConfig::default())
			.into_iter()
			.map(|p| p.region_label())
			.collect();
		assert_eq!(names, ["Gauteng, South Africa", "Western Cape, South Africa"]);
	}

	#[test]
	fn view_needs_a_daily_outlook() {
		let now = Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap();
		assert!(ForecastView::build(&snapshot(None), now, 0, &WidgetConfig::default()).is_none());
	}
}
