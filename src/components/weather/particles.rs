//! Ambient "mushi" particles: drifting point lights behind the forecast.
//!
//! A fixed pool is allocated once and stepped every animation frame. Each
//! step drifts the particle according to the weather, pushes it away from
//! the pointer, and advances its opacity along a triangular twinkle. A
//! particle that leaves the canvas is re-randomized in place on the
//! opposite edge; slots are never freed or reallocated.

use rand::Rng;

use super::config::MushiConfig;
use super::theme::{Color, Theme, ThemeState, WeatherCategory};

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

/// Latest pointer or touch position in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
}

/// Everything a tick reads from outside the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
	pub theme: ThemeState,
	pub pointer: Option<Pointer>,
}

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	/// Radius in [1, 3).
	pub size: f64,
	/// Vertical drift magnitude in [0.2, base_speed + 0.2).
	pub speed_y: f64,
	/// Horizontal drift in [-0.25, 0.25).
	pub speed_x: f64,
	pub opacity: f64,
	pub growing: bool,
	pub weather: WeatherCategory,
	pub theme: Theme,
}

impl Particle {
	/// A fresh particle scattered anywhere on the canvas.
	pub fn spawn<R: Rng + ?Sized>(
		state: ThemeState,
		bounds: Bounds,
		config: &MushiConfig,
		rng: &mut R,
	) -> Self {
		let mut particle = Self {
			x: 0.0,
			y: 0.0,
			size: 0.0,
			speed_y: 0.0,
			speed_x: 0.0,
			opacity: config.opacity_min,
			growing: true,
			weather: state.weather,
			theme: state.theme,
		};
		particle.respawn(bounds, config, rng);
		particle.y = rng.random::<f64>() * bounds.height;
		particle
	}

	/// Re-randomize this slot just outside the edge it drifts in from.
	fn respawn<R: Rng + ?Sized>(&mut self, bounds: Bounds, config: &MushiConfig, rng: &mut R) {
		self.x = rng.random::<f64>() * bounds.width;
		self.y = match self.weather {
			WeatherCategory::Clear => bounds.height + config.edge_margin,
			WeatherCategory::Precipitating => -config.edge_margin,
		};
		self.size = rng.random::<f64>() * 2.0 + 1.0;
		self.speed_y = rng.random::<f64>() * config.base_speed + 0.2;
		self.speed_x = (rng.random::<f64>() - 0.5) * 0.5;
		self.opacity = (rng.random::<f64>() * 0.5 + config.opacity_min).min(config.opacity_max);
		self.growing = true;
	}

	/// Advance one animation frame.
	pub fn update<R: Rng + ?Sized>(
		&mut self,
		input: &TickInput,
		bounds: Bounds,
		config: &MushiConfig,
		rng: &mut R,
	) {
		self.weather = input.theme.weather;
		self.theme = input.theme.theme;

		self.drift(bounds, config, rng);
		if let Some(pointer) = input.pointer {
			self.repel(pointer, config);
		}
		self.pulse(config);
	}

	fn drift<R: Rng + ?Sized>(&mut self, bounds: Bounds, config: &MushiConfig, rng: &mut R) {
		match self.weather {
			WeatherCategory::Clear => {
				self.y -= self.speed_y * config.clear_rise_factor;
				if self.y < -config.edge_margin {
					self.respawn(bounds, config, rng);
				}
			}
			WeatherCategory::Precipitating => {
				self.y += self.speed_y;
				if self.y > bounds.height + config.edge_margin {
					self.respawn(bounds, config, rng);
				}
			}
		}
		self.x += self.speed_x;
	}

	/// Push away from the pointer, strongest at its centre and zero at the radius.
	fn repel(&mut self, pointer: Pointer, config: &MushiConfig) {
		let (dx, dy) = (pointer.x - self.x, pointer.y - self.y);
		let dist = (dx * dx + dy * dy).sqrt();
		// No direction to push along when exactly under the pointer
		if dist <= 0.0 || dist >= config.interaction_radius {
			return;
		}
		let force = (config.interaction_radius - dist) / config.interaction_radius;
		self.x -= (dx / dist) * force * config.push_strength;
		self.y -= (dy / dist) * force * config.push_strength;
	}

	fn pulse(&mut self, config: &MushiConfig) {
		if self.growing {
			self.opacity = (self.opacity + config.pulse_step).min(config.opacity_max);
			if self.opacity >= config.opacity_max {
				self.growing = false;
			}
		} else {
			self.opacity = (self.opacity - config.pulse_step).max(config.opacity_min);
			if self.opacity <= config.opacity_min {
				self.growing = true;
			}
		}
	}

	/// Draw instructions for the current frame.
	pub fn sprite(&self) -> ParticleSprite {
		let palette = self.theme.palette();
		ParticleSprite {
			x: self.x,
			y: self.y,
			radius: self.size,
			fill: palette.fill.with_alpha(self.opacity),
			glow: palette.glow,
			blur: self.size * 2.0,
		}
	}
}

/// A filled, glowing circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSprite {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: Color,
	pub glow: Color,
	/// Shadow blur in pixels.
	pub blur: f64,
}

/// Manages the fixed particle pool.
pub struct ParticleSystem {
	pub particles: Vec<Particle>,
	bounds: Bounds,
	config: MushiConfig,
}

impl ParticleSystem {
	pub fn new<R: Rng + ?Sized>(
		config: MushiConfig,
		state: ThemeState,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let bounds = Bounds { width, height };
		let particles = (0..config.particle_count)
			.map(|_| Particle::spawn(state, bounds, &config, rng))
			.collect();

		Self {
			particles,
			bounds,
			config,
		}
	}

	/// Update every particle with the same theme and pointer snapshot.
	pub fn update<R: Rng + ?Sized>(&mut self, input: &TickInput, rng: &mut R) {
		for p in &mut self.particles {
			p.update(input, self.bounds, &self.config, rng);
		}
	}

	/// Adopt new canvas bounds. Positions are left alone; strays are
	/// respawned by their next out-of-bounds check.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds { width, height };
	}

	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	pub fn sprites(&self) -> impl Iterator<Item = ParticleSprite> + '_ {
		self.particles.iter().map(Particle::sprite)
	}
}
