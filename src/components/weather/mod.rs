//! Weather widget core and its Leptos glue.
//!
//! The pure modules carry all of the widget's behaviour and are driven by the
//! components once per display frame:
//! - [`particles`]: a fixed pool of drifting, pointer-shy, twinkling lights
//! - [`theme`]: day phase and weather category from local solar times
//! - [`scroll`]: drag-to-scroll with an exponentially decaying glide
//! - [`geo`]: haversine distance and place comparisons
//! - [`forecast`]: display values derived from a forecast snapshot
//!
//! # Example
//!
//! ```ignore
//! let resolution = ThemeResolution::resolve(city_time, sunrise, sunset, 61, &ThemeConfig::default());
//! let theme = RwSignal::new(resolution.state());
//!
//! view! {
//!     <WeatherBackdrop theme=theme />
//!     <MomentumStrip axis=ScrollAxis::Horizontal class="hourly">{hours}</MomentumStrip>
//! }
//! ```

mod component;
pub mod config;
pub mod forecast;
pub mod geo;
pub mod particles;
mod render;
pub mod scroll;
pub mod theme;
pub mod types;

pub use component::{MomentumStrip, WeatherBackdrop};
pub use config::WidgetConfig;
pub use forecast::ForecastView;
pub use scroll::ScrollAxis;
pub use theme::{ThemeResolution, ThemeState};
pub use types::ForecastSnapshot;
