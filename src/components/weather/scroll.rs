//! Drag-to-scroll with a decaying glide on release.
//!
//! One [`MomentumScroll`] drives one scrollable axis. Pointer positions and
//! scroll offsets are plain 1-D values along that axis. The caller writes the
//! target returned by [`MomentumScroll::pointer_move`], then reports the offset
//! the element actually took through [`MomentumScroll::applied`], since the
//! browser clamps scrolling at either end of the content.

use super::config::ScrollConfig;

/// Which scroll offset of the element a controller drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAxis {
	/// `scrollLeft`, driven by pointer x.
	Horizontal,
	/// `scrollTop`, driven by pointer y.
	Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
	Idle,
	Dragging {
		pointer_anchor: f64,
		scroll_anchor: f64,
		/// Element offset before the latest move.
		previous: f64,
		velocity: f64,
	},
	Gliding {
		offset: f64,
		velocity: f64,
	},
}

/// Drag/glide state machine for a single axis.
#[derive(Clone, Debug)]
pub struct MomentumScroll {
	phase: Phase,
	config: ScrollConfig,
}

impl MomentumScroll {
	pub fn new(config: ScrollConfig) -> Self {
		Self {
			phase: Phase::Idle,
			config,
		}
	}

	/// Start a drag. Any glide in flight stops immediately.
	pub fn pointer_down(&mut self, pointer: f64, scroll_offset: f64) {
		self.phase = Phase::Dragging {
			pointer_anchor: pointer,
			scroll_anchor: scroll_offset,
			previous: scroll_offset,
			velocity: 0.0,
		};
	}

	/// Returns the offset to apply, or `None` when not dragging.
	///
	/// `scroll_offset` is the element's offset before this move.
	pub fn pointer_move(&mut self, pointer: f64, scroll_offset: f64) -> Option<f64> {
		let Phase::Dragging {
			pointer_anchor,
			scroll_anchor,
			ref mut previous,
			..
		} = self.phase
		else {
			return None;
		};
		*previous = scroll_offset;
		Some(scroll_anchor - (pointer - pointer_anchor) * self.config.drag_multiplier)
	}

	/// Record the offset the element settled on after a move.
	///
	/// The glide velocity is the distance the element really moved, so a
	/// drag pinned against either end of the content carries no momentum.
	pub fn applied(&mut self, scroll_offset: f64) {
		if let Phase::Dragging {
			previous,
			ref mut velocity,
			..
		} = self.phase
		{
			*velocity = scroll_offset - previous;
		}
	}

	/// End the drag and glide from `scroll_offset`. Returns whether a glide started.
	pub fn pointer_up(&mut self, scroll_offset: f64) -> bool {
		let Phase::Dragging { velocity, .. } = self.phase else {
			return false;
		};
		if velocity.abs() < self.config.min_velocity {
			self.phase = Phase::Idle;
			return false;
		}
		self.phase = Phase::Gliding {
			offset: scroll_offset,
			velocity,
		};
		true
	}

	/// End the drag without gliding.
	pub fn pointer_leave(&mut self) {
		if matches!(self.phase, Phase::Dragging { .. }) {
			self.phase = Phase::Idle;
		}
	}

	/// Advance the glide by one frame and return the new offset.
	///
	/// Returns `None` once the glide has stopped, been cancelled, or was
	/// pre-empted by a new drag; the caller should stop scheduling frames.
	pub fn glide_step(&mut self) -> Option<f64> {
		let Phase::Gliding {
			ref mut offset,
			ref mut velocity,
		} = self.phase
		else {
			return None;
		};
		if velocity.abs() < self.config.min_velocity {
			self.phase = Phase::Idle;
			return None;
		}
		*velocity *= self.config.decay;
		*offset += *velocity;
		Some(*offset)
	}

	/// Drop any drag or glide. A cancelled glide never resumes.
	pub fn cancel(&mut self) {
		self.phase = Phase::Idle;
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.phase, Phase::Dragging { .. })
	}

	pub fn is_gliding(&self) -> bool {
		matches!(self.phase, Phase::Gliding { .. })
	}
}

impl Default for MomentumScroll {
	fn default() -> Self {
		Self::new(ScrollConfig::default())
	}
}
