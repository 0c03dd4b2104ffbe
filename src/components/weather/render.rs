//! Canvas rendering for the particle backdrop.
//!
//! The canvas is cleared every frame and each particle is drawn as a filled
//! circle with a coloured shadow for its glow.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::particles::{ParticleSprite, ParticleSystem};

/// Renders one frame of the backdrop.
pub fn render(ctx: &CanvasRenderingContext2d, particles: &ParticleSystem) {
	let bounds = particles.bounds();
	ctx.clear_rect(0.0, 0.0, bounds.width, bounds.height);

	for sprite in particles.sprites() {
		draw_sprite(ctx, &sprite);
	}
}

fn draw_sprite(ctx: &CanvasRenderingContext2d, sprite: &ParticleSprite) {
	ctx.begin_path();
	let _ = ctx.arc(sprite.x, sprite.y, sprite.radius, 0.0, TAU);

	ctx.set_fill_style_str(&sprite.fill.to_css());
	ctx.set_shadow_color(&sprite.glow.to_css());
	ctx.set_shadow_blur(sprite.blur);
	ctx.fill();
	// Shadow state is sticky on the context
	ctx.set_shadow_blur(0.0);
}
