//! mushi-weather: a weather dashboard widget with an ambient firefly backdrop.
//!
//! The page server embeds an already-fetched forecast as JSON; this crate
//! resolves the place's day phase from its local solar times, themes a
//! drifting particle backdrop to match, and renders the forecast with
//! drag-to-scroll hour and day strips.

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, log, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::weather::{
	ForecastSnapshot, ForecastView, MomentumStrip, ScrollAxis, ThemeResolution, ThemeState,
	WeatherBackdrop, WidgetConfig,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mushi-weather: logging initialized");
}

fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load JSON from a `<script>` element by id.
///
/// A missing element is logged at `missing`; malformed JSON always warns.
fn load_json<T: DeserializeOwned>(id: &str, missing: Level) -> Option<T> {
	parse_script(id, script_text(id), missing)
}

fn parse_script<T: DeserializeOwned>(id: &str, text: Option<String>, missing: Level) -> Option<T> {
	let Some(json_text) = text else {
		log!(missing, "mushi-weather: no <script id=\"{}\"> on the page", id);
		return None;
	};

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("mushi-weather: failed to parse #{}: {}", id, e);
			None
		}
	}
}

fn now_utc() -> DateTime<Utc> {
	DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// The viewer's own UTC offset. JS reports minutes *behind* UTC.
fn viewer_utc_offset_seconds() -> i32 {
	-(js_sys::Date::new_0().get_timezone_offset() as i32) * 60
}

/// Current conditions, hour and day strips for one resolved forecast.
#[component]
fn ForecastCard(forecast: ForecastView, config: WidgetConfig) -> impl IntoView {
	let aqi = match forecast.air_quality {
		Some((value, band)) => view! {
			<span class=format!("aqi-badge {}", band.css_class())>
				{format!("{} {}", band.label(), value)}
			</span>
		}
		.into_any(),
		None => view! { <span class="aqi-badge">"N/A"</span> }.into_any(),
	};

	let hours = forecast
		.hours
		.into_iter()
		.map(|slot| {
			view! {
				<div class="hour-item" class:now=slot.is_now>
					<span class="hour-time">{slot.label}</span>
					<i class=format!("hour-icon ph ph-{}", slot.icon)></i>
					<span class="hour-temp">{format!("{}°", slot.temperature)}</span>
				</div>
			}
		})
		.collect_view();

	let details = forecast.details;
	let details_open = RwSignal::new(false);
	let caret = move || {
		if details_open.get() {
			"ph ph-caret-up"
		} else {
			"ph ph-caret-down"
		}
	};

	let others = (!forecast.other_matches.is_empty()).then(|| {
		let items = forecast
			.other_matches
			.into_iter()
			.map(|place| {
				view! {
					<li>
						<span class="match-name">{place.name.clone()}</span>
						<span class="match-region">{place.region_label()}</span>
					</li>
				}
			})
			.collect_view();
		view! {
			<aside class="other-matches">
				<h2>"Also found"</h2>
				<ul>{items}</ul>
			</aside>
		}
	});

	let days = forecast
		.days
		.into_iter()
		.map(|slot| {
			view! {
				<div class="day-item">
					<span class="day-name">{slot.label}</span>
					<i class=format!("day-icon ph ph-{}", slot.icon)></i>
					<span class="day-range">{format!("{}° / {}°", slot.high, slot.low)}</span>
				</div>
			}
		})
		.collect_view();

	view! {
		<section class="weather-card">
			<header>
				<h1 class="city-name">{forecast.place}</h1>
				<span class="country-code">{forecast.region}</span>
				<span class="time-badge">{forecast.resolution.label()}</span>
			</header>
			<p class="date-display">{forecast.date}</p>
			<p class="temp-value">{format!("{}°", forecast.temperature)}</p>
			<p class="weather-desc">{forecast.condition.description}</p>
			<dl class="weather-stats">
				<dt>"Feels like"</dt>
				<dd>{format!("{}°", forecast.feels_like)}</dd>
				<dt>"Wind"</dt>
				<dd>{format!("{} km/h {}", forecast.wind_speed, forecast.wind_direction)}</dd>
				<dt>"Humidity"</dt>
				<dd>{format!("{}%", forecast.humidity)}</dd>
				<dt>"Air quality"</dt>
				<dd>{aqi}</dd>
			</dl>
			<MomentumStrip axis=ScrollAxis::Horizontal config=config.scroll.clone() class="hourly-strip">
				{hours}
			</MomentumStrip>
			<MomentumStrip axis=ScrollAxis::Vertical config=config.scroll class="daily-strip">
				{days}
			</MomentumStrip>
			<button class="details-toggle" on:click=move |_| details_open.update(|open| *open = !*open)>
				"Details "
				<i class=caret></i>
			</button>
			<dl class="details-wrapper" class:open=move || details_open.get()>
				<dt>"UV index"</dt>
				<dd>{details.uv_index}</dd>
				<dt>"Visibility"</dt>
				<dd>{format!("{} km", details.visibility_km)}</dd>
				<dt>"Wind gusts"</dt>
				<dd>{format!("{} km/h", details.wind_gusts)}</dd>
				<dt>"Wind direction"</dt>
				<dd>{details.wind_direction}</dd>
				<dt>"Dew point"</dt>
				<dd>{format!("{}°", details.dew_point)}</dd>
				<dt>"Pressure"</dt>
				<dd>{format!("{} hPa", details.pressure)}</dd>
				<dt>"Cloud cover"</dt>
				<dd>{format!("{}%", details.cloud_cover)}</dd>
				<dt>"Day high"</dt>
				<dd>{format!("{}°", details.day_high)}</dd>
				<dt>"Night low"</dt>
				<dd>{format!("{}°", details.night_low)}</dd>
				<dt>"Precipitation"</dt>
				<dd>
					{format!("{}% / {} mm", details.precipitation_probability, details.precipitation_sum)}
				</dd>
			</dl>
			{others}
		</section>
	}
}

/// Main application component.
/// Loads the forecast from the DOM, resolves its theme and renders the widget.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// Config is optional; the defaults cover every knob
	let config: WidgetConfig = load_json("weather-config", Level::Debug).unwrap_or_default();
	let forecast = load_json::<ForecastSnapshot>("forecast-data", Level::Warn).and_then(|snapshot| {
		info!(
			"mushi-weather: loaded forecast for {}, {} ({} hours, {} days)",
			snapshot.place.name,
			snapshot.place.country,
			snapshot.hourly.len(),
			snapshot.daily.len()
		);
		ForecastView::build(&snapshot, now_utc(), viewer_utc_offset_seconds(), &config)
	});

	// Until a forecast resolves the backdrop keeps the default theme
	let theme = RwSignal::new(
		forecast
			.as_ref()
			.map(|f| f.resolution.state())
			.unwrap_or_default(),
	);
	let backdrop_classes = forecast
		.as_ref()
		.map(|f| f.resolution.backdrop_classes())
		.unwrap_or_else(|| "theme-night".to_string());
	if let Some(f) = &forecast {
		info!(
			"mushi-weather: {} at {} local, {:?}",
			f.resolution.phase,
			f.city_time.format("%H:%M"),
			f.resolution.weather
		);
	}

	let card = match forecast {
		Some(forecast) => view! { <ForecastCard forecast=forecast config=config.clone() /> }.into_any(),
		None => view! { <p class="weather-empty">"No forecast available."</p> }.into_any(),
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Weather" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Body attr:class=backdrop_classes />

		<WeatherBackdrop theme=theme config=config.mushi />
		<main class="weather-app">{card}</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absent_script_yields_nothing() {
		let snapshot: Option<ForecastSnapshot> = parse_script("forecast-data", None, Level::Warn);
		assert!(snapshot.is_none());
		let config: Option<WidgetConfig> = parse_script("weather-config", None, Level::Debug);
		assert_eq!(config.unwrap_or_default(), WidgetConfig::default());
	}

	#[test]
	fn malformed_script_yields_nothing() {
		let text = Some("{ \"place\": ".to_string());
		assert!(parse_script::<ForecastSnapshot>("forecast-data", text, Level::Warn).is_none());
	}

	#[test]
	fn present_script_is_parsed() {
		let text = Some(r#"{ "theme": { "transition_window_minutes": 30 } }"#.to_string());
		let config: WidgetConfig = parse_script("weather-config", text, Level::Debug).unwrap();
		assert_eq!(config.theme.transition_window_minutes, 30);
	}
}
