//! Leptos components wrapping the particle canvas and the drag-scroll strips.
//!
//! The backdrop runs its own `requestAnimationFrame` loop for as long as it is
//! mounted, reading the latest theme and pointer each frame. Strips only
//! schedule frames while a glide is in flight. Both release their frames and
//! listeners in `on_cleanup`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent,
	Window,
};

use super::config::{MushiConfig, ScrollConfig};
use super::particles::{ParticleSystem, Pointer, TickInput};
use super::render;
use super::scroll::{MomentumScroll, ScrollAxis};
use super::theme::ThemeState;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type WindowListener = (&'static str, Closure<dyn FnMut(Event)>);

fn request_frame(callback: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(callback.as_ref().unchecked_ref())
		.ok()
}

fn cancel_frame(frame: &Cell<Option<i32>>) {
	if let (Some(id), Some(window)) = (frame.take(), web_sys::window()) {
		let _ = window.cancel_animation_frame(id);
	}
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn listen(
	window: &Window,
	event: &'static str,
	handler: impl FnMut(Event) + 'static,
) -> Option<WindowListener> {
	let callback = Closure::<dyn FnMut(Event)>::new(handler);
	window
		.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
		.ok()?;
	Some((event, callback))
}

/// Particle pool plus the generator that feeds its respawns.
struct BackdropContext {
	particles: ParticleSystem,
	rng: SmallRng,
}

/// Frame and listener handles of a running backdrop.
#[derive(Default)]
struct BackdropLoop {
	stopped: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: FrameCallback,
	listeners: Vec<WindowListener>,
}

impl BackdropLoop {
	fn stop(&mut self) {
		self.stopped.set(true);
		cancel_frame(&self.frame);
		if let Some(window) = web_sys::window() {
			for (event, callback) in self.listeners.drain(..) {
				let _ = window
					.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		info!("mushi-weather: backdrop stopped");
	}
}

/// Fullscreen canvas of drifting particles themed by `theme`.
///
/// The canvas ignores pointer events; pointer and touch positions are read
/// from the window so the particles react even under the forecast card.
#[component]
pub fn WeatherBackdrop(
	#[prop(into)] theme: Signal<ThemeState>,
	#[prop(optional)] config: MushiConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = StoredValue::new_local(BackdropLoop::default());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some((w, h)) = viewport_size(&window) else {
			warn!("mushi-weather: viewport size unavailable, backdrop disabled");
			return;
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("mushi-weather: canvas has no 2d context, backdrop disabled");
			return;
		};

		let mut rng = SmallRng::seed_from_u64(js_sys::Date::now().to_bits());
		let particles = ParticleSystem::new(config.clone(), theme.get_untracked(), w, h, &mut rng);
		let count = particles.particles.len();
		let backdrop = Rc::new(RefCell::new(BackdropContext { particles, rng }));
		let pointer: Rc<Cell<Option<Pointer>>> = Rc::new(Cell::new(None));

		let mut listeners = Vec::new();

		let (backdrop_resize, canvas_resize) = (backdrop.clone(), canvas.clone());
		listeners.extend(listen(&window, "resize", move |_| {
			let Some((nw, nh)) = web_sys::window().and_then(|win| viewport_size(&win)) else {
				return;
			};
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			backdrop_resize.borrow_mut().particles.resize(nw, nh);
			debug!("mushi-weather: backdrop resized to {nw}x{nh}");
		}));

		let pointer_mouse = pointer.clone();
		listeners.extend(listen(&window, "mousemove", move |ev| {
			if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
				pointer_mouse.set(Some(Pointer {
					x: ev.client_x() as f64,
					y: ev.client_y() as f64,
				}));
			}
		}));

		let pointer_touch = pointer.clone();
		listeners.extend(listen(&window, "touchmove", move |ev| {
			let touch = ev
				.dyn_ref::<TouchEvent>()
				.and_then(|ev| ev.touches().get(0));
			if let Some(touch) = touch {
				pointer_touch.set(Some(Pointer {
					x: touch.client_x() as f64,
					y: touch.client_y() as f64,
				}));
			}
		}));

		let pointer_out = pointer.clone();
		listeners.extend(listen(&window, "mouseout", move |_| {
			pointer_out.set(None);
		}));

		let (stopped, frame, animate) =
			handle.with_value(|h| (h.stopped.clone(), h.frame.clone(), h.animate.clone()));
		let (frame_inner, animate_inner) = (frame.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if stopped.get() {
				return;
			}
			let input = TickInput {
				theme: theme.try_get_untracked().unwrap_or_default(),
				pointer: pointer.get(),
			};
			{
				let mut c = backdrop.borrow_mut();
				let BackdropContext { particles, rng } = &mut *c;
				particles.update(&input, rng);
				render::render(&ctx, particles);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame.set(request_frame(cb));
		}

		handle.update_value(|h| h.listeners.extend(listeners));
		info!("mushi-weather: backdrop started with {count} particles at {w}x{h}");
	});

	on_cleanup(move || {
		handle.try_update_value(BackdropLoop::stop);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="mushi-backdrop"
			style="position: fixed; inset: 0; display: block; pointer-events: none;"
		/>
	}
}

/// Glide animation for one strip.
#[derive(Default)]
struct GlideLoop {
	frame: Rc<Cell<Option<i32>>>,
	step: FrameCallback,
}

impl GlideLoop {
	fn start(&self, scroll: Rc<RefCell<MomentumScroll>>, element: HtmlElement, axis: ScrollAxis) {
		cancel_frame(&self.frame);
		let (frame, step_inner) = (self.frame.clone(), self.step.clone());
		*self.step.borrow_mut() = Some(Closure::new(move || {
			frame.set(None);
			let Some(offset) = scroll.borrow_mut().glide_step() else {
				return;
			};
			write_offset(&element, axis, offset);
			if let Some(ref cb) = *step_inner.borrow() {
				frame.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *self.step.borrow() {
			self.frame.set(request_frame(cb));
		}
	}

	fn stop(&self) {
		cancel_frame(&self.frame);
		self.step.borrow_mut().take();
	}
}

struct StripState {
	scroll: Rc<RefCell<MomentumScroll>>,
	glide: GlideLoop,
}

fn pointer_position(ev: &MouseEvent, axis: ScrollAxis) -> f64 {
	match axis {
		ScrollAxis::Horizontal => ev.page_x() as f64,
		ScrollAxis::Vertical => ev.page_y() as f64,
	}
}

fn read_offset(element: &HtmlElement, axis: ScrollAxis) -> f64 {
	match axis {
		ScrollAxis::Horizontal => element.scroll_left() as f64,
		ScrollAxis::Vertical => element.scroll_top() as f64,
	}
}

fn write_offset(element: &HtmlElement, axis: ScrollAxis, offset: f64) {
	match axis {
		ScrollAxis::Horizontal => {
			element.scroll_to_with_x_and_y(offset, read_offset(element, ScrollAxis::Vertical))
		}
		ScrollAxis::Vertical => {
			element.scroll_to_with_x_and_y(read_offset(element, ScrollAxis::Horizontal), offset)
		}
	}
}

/// A scrollable strip that can be dragged with the mouse and coasts on release.
///
/// Use one per axis: the hourly forecast scrolls horizontally, the daily
/// forecast vertically. Strips never share state.
#[component]
pub fn MomentumStrip(
	axis: ScrollAxis,
	#[prop(optional)] config: ScrollConfig,
	#[prop(into, optional)] class: String,
	children: Children,
) -> impl IntoView {
	let strip_ref = NodeRef::<leptos::html::Div>::new();
	let dragging = RwSignal::new(false);
	let state = StoredValue::new_local(StripState {
		scroll: Rc::new(RefCell::new(MomentumScroll::new(config))),
		glide: GlideLoop::default(),
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some(strip) = strip_ref.get() else {
			return;
		};
		let strip: HtmlElement = strip.into();
		state.with_value(|s| {
			s.glide.stop();
			s.scroll
				.borrow_mut()
				.pointer_down(pointer_position(&ev, axis), read_offset(&strip, axis));
		});
		dragging.set(true);
	};

	let on_mousemove = move |ev: MouseEvent| {
		if !dragging.get_untracked() {
			return;
		}
		ev.prevent_default();
		let Some(strip) = strip_ref.get() else {
			return;
		};
		let strip: HtmlElement = strip.into();
		state.with_value(|s| {
			let mut scroll = s.scroll.borrow_mut();
			let target = scroll.pointer_move(pointer_position(&ev, axis), read_offset(&strip, axis));
			if let Some(offset) = target {
				write_offset(&strip, axis, offset);
				scroll.applied(read_offset(&strip, axis));
			}
		});
	};

	let on_mouseup = move |_: MouseEvent| {
		dragging.set(false);
		let Some(strip) = strip_ref.get() else {
			return;
		};
		let strip: HtmlElement = strip.into();
		state.with_value(|s| {
			if s.scroll.borrow_mut().pointer_up(read_offset(&strip, axis)) {
				debug!("mushi-weather: {axis:?} glide launched");
				s.glide.start(s.scroll.clone(), strip.clone(), axis);
			}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		dragging.set(false);
		state.with_value(|s| s.scroll.borrow_mut().pointer_leave());
	};

	on_cleanup(move || {
		state.try_with_value(|s| {
			s.scroll.borrow_mut().cancel();
			s.glide.stop();
		});
	});

	view! {
		<div
			node_ref=strip_ref
			class=class
			class:active=move || dragging.get()
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
		>
			{children()}
		</div>
	}
}
