//! Forecast snapshot structures handed to the widget by the page.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// A latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Coordinates {
	pub latitude: f64,
	pub longitude: f64,
}

impl Coordinates {
	pub const fn new(latitude: f64, longitude: f64) -> Self {
		Self {
			latitude,
			longitude,
		}
	}
}

/// A geocoded place candidate.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Place {
	pub name: String,
	pub country: String,
	/// First-level administrative area (state, province), if known.
	#[serde(default)]
	pub admin: Option<String>,
	#[serde(flatten)]
	pub coordinates: Coordinates,
}

impl Place {
	/// "Admin, Country", or just the country when the admin area is unknown
	/// or repeats the place name (city-states, capitals).
	pub fn region_label(&self) -> String {
		match self.admin.as_deref() {
			Some(admin) if !admin.is_empty() && !admin.eq_ignore_ascii_case(&self.name) => {
				format!("{admin}, {}", self.country)
			}
			_ => self.country.clone(),
		}
	}
}

/// Conditions at the time of the fetch.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
	/// WMO weather interpretation code.
	pub weather_code: u8,
	pub temperature: f64,
	pub apparent_temperature: f64,
	pub relative_humidity: f64,
	pub wind_speed: f64,
	pub wind_gusts: f64,
	/// Degrees clockwise from north.
	pub wind_direction: f64,
	pub dew_point: f64,
	pub surface_pressure: f64,
	pub cloud_cover: f64,
	/// Metres.
	pub visibility: f64,
	pub uv_index: Option<f64>,
}

/// One hour of the hourly forecast, in the place's local wall-clock time.
#[derive(Clone, Debug, Deserialize)]
pub struct HourlyBucket {
	#[serde(with = "local_time")]
	pub time: NaiveDateTime,
	pub temperature: f64,
	pub weather_code: u8,
	pub is_day: bool,
}

/// One day of the daily forecast. Sunrise and sunset are local wall-clock times.
#[derive(Clone, Debug, Deserialize)]
pub struct DailyOutlook {
	pub date: NaiveDate,
	#[serde(with = "local_time")]
	pub sunrise: NaiveDateTime,
	#[serde(with = "local_time")]
	pub sunset: NaiveDateTime,
	pub weather_code: u8,
	pub temperature_max: f64,
	pub temperature_min: f64,
	#[serde(default)]
	pub precipitation_probability_max: Option<f64>,
	#[serde(default)]
	pub precipitation_sum: f64,
}

/// A complete, already-validated forecast for one place.
#[derive(Clone, Debug, Deserialize)]
pub struct ForecastSnapshot {
	pub place: Place,
	/// The place's offset from UTC.
	pub utc_offset_seconds: i32,
	pub current: CurrentConditions,
	#[serde(default)]
	pub hourly: Vec<HourlyBucket>,
	/// Today first.
	pub daily: Vec<DailyOutlook>,
	#[serde(default)]
	pub us_aqi: Option<u16>,
	/// The viewer's own position, when the browser granted it.
	#[serde(default)]
	pub user_location: Option<Coordinates>,
	/// Other geocoder matches for the same search, in relevance order.
	#[serde(default)]
	pub candidates: Vec<Place>,
}

impl ForecastSnapshot {
	pub fn today(&self) -> Option<&DailyOutlook> {
		self.daily.first()
	}
}

/// Local timestamps arrive as `YYYY-MM-DDTHH:MM`, with or without seconds.
mod local_time {
	use chrono::NaiveDateTime;
	use serde::{Deserialize, Deserializer, de::Error};

	const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		FORMATS
			.iter()
			.find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
			.ok_or_else(|| D::Error::custom(format!("invalid local time: {raw}")))
	}
}
