//! Leptos component wrapping the web graph canvas.
//!
//! The component creates an HTML canvas element and wires up pointer handlers
//! for node dragging and selection. An animation loop runs via
//! `requestAnimationFrame`, ticking the simulation and repainting each frame.
//! A selected node is shown through the caller's `render_info_box` callback in
//! an overlay anchored to the top-right corner.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};

use super::config::{LayoutConfig, Viewport};
use super::interaction::{InteractionController, SelectionChange};
use super::render;
use super::scene::Scene;
use super::session::{GraphSource, SessionChange, SimulationSession};
use super::theme::Theme;
use super::types::GraphNode;

/// Everything the frame loop and the pointer handlers share.
struct GraphContext {
	session: SimulationSession,
	interaction: InteractionController,
	theme: Theme,
	rng: SmallRng,
}

impl GraphContext {
	fn new(viewport: Viewport, config: LayoutConfig) -> Self {
		let click_tolerance = config.interaction.click_tolerance;
		Self {
			session: SimulationSession::new(viewport, config),
			interaction: InteractionController::new(click_tolerance),
			theme: Theme::default(),
			rng: SmallRng::seed_from_u64(browser_seed()),
		}
	}

	fn sync(&mut self, source: Option<&GraphSource>) -> SessionChange {
		self.interaction.sync_session(&mut self.session, source, &mut self.rng)
	}

	fn selected_node(&self) -> Option<GraphNode> {
		self.interaction.selected_node(self.session.simulation()?)
	}

	/// Returns `true` when the press landed on a node.
	fn pointer_down(&mut self, x: f64, y: f64) -> bool {
		let Some(sim) = self.session.simulation_mut() else {
			return false;
		};
		let hit = sim.node_at(x, y);
		self.interaction.pointer_down(hit, x, y, &mut sim.pins());
		hit.is_some()
	}

	fn pointer_move(&mut self, x: f64, y: f64) -> bool {
		let Some(sim) = self.session.simulation_mut() else {
			return false;
		};
		self.interaction.pointer_move(x, y, &mut sim.pins())
	}

	fn pointer_up(&mut self, x: f64, y: f64) -> Option<SelectionChange> {
		let sim = self.session.simulation_mut()?;
		self.interaction.pointer_up(x, y, &mut sim.pins())
	}

	fn pointer_cancel(&mut self) {
		if let Some(sim) = self.session.simulation_mut() {
			self.interaction.cancel(&mut sim.pins());
		}
	}

	/// Ticks and repaints. Returns `true` when the layout moved.
	fn frame(&mut self, ctx: &CanvasRenderingContext2d) -> bool {
		let moved = self.session.tick();
		let scene = match self.session.simulation() {
			Some(sim) => Scene::build(sim, self.interaction.selected(), &self.theme),
			None => Scene::default(),
		};
		render::draw_scene(&scene, ctx, self.session.viewport(), &self.theme);
		moved
	}
}

fn browser_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &PointerEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// `data` carries the dataset together with its identity: a new name builds a
/// fresh layout, new data under the same name is swapped into the running one,
/// and `None` clears the canvas. `width`/`height` bound both the canvas and the
/// layout. `render_info_box` builds the overlay for the selected node and is
/// re-run with the current record while the layout is moving.
#[component]
pub fn WebGraph(
	#[prop(into)] data: Signal<Option<GraphSource>>,
	#[prop(into)] render_info_box: Callback<GraphNode, AnyView>,
	#[prop(into, default = Signal::stored(800.0))] width: Signal<f64>,
	#[prop(into, default = Signal::stored(600.0))] height: Signal<f64>,
	#[prop(optional)] config: Option<LayoutConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let viewport = Viewport::new(width.get_untracked(), height.get_untracked());
	let context = Rc::new(RefCell::new(GraphContext::new(
		viewport,
		config.unwrap_or_default(),
	)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let selected_node = RwSignal::new(None::<GraphNode>);

	let context_data = context.clone();
	Effect::new(move |_| {
		let source = data.get();
		let (change, node) = {
			let mut c = context_data.borrow_mut();
			let change = c.sync(source.as_ref());
			(change, c.selected_node())
		};
		if change != SessionChange::Unchanged {
			debug!("web-graph: data sync {:?}", change);
			selected_node.set(node);
		}
	});

	let context_size = context.clone();
	Effect::new(move |_| {
		let viewport = Viewport::new(width.get(), height.get());
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas.set_width(viewport.width as u32);
			canvas.set_height(viewport.height as u32);
		}
		context_size.borrow_mut().session.set_viewport(viewport);
	});

	let (context_init, animate_init) = (context.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let viewport = context_init.borrow().session.viewport();
		canvas.set_width(viewport.width as u32);
		canvas.set_height(viewport.height as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("web-graph: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("web-graph: canvas 2d context unavailable");
				return;
			}
		};

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Stop once the canvas has been unmounted.
			if !canvas.is_connected() {
				return;
			}
			let current = {
				let mut c = context_anim.borrow_mut();
				c.frame(&ctx).then(|| c.selected_node()).flatten()
			};
			// Keep the overlay's record in step with the moving layout.
			if let Some(node) = current {
				if selected_node.with_untracked(|shown| shown.as_ref() != Some(&node)) {
					selected_node.set(Some(node));
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_pd = context.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		if context_pd.borrow_mut().pointer_down(x, y) {
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grabbing");
		}
		if let Err(e) = canvas.set_pointer_capture(ev.pointer_id()) {
			warn!("web-graph: pointer capture failed: {:?}", e);
		}
	};

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		context_pm.borrow_mut().pointer_move(x, y);
	};

	let context_pu = context.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);
		let _ = canvas.release_pointer_capture(ev.pointer_id());
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grab");

		let update = {
			let mut c = context_pu.borrow_mut();
			c.pointer_up(x, y).map(|change| match change {
				SelectionChange::Selected(_) => c.selected_node(),
				SelectionChange::Cleared => None,
			})
		};
		if let Some(node) = update {
			selected_node.set(node);
		}
	};

	let context_pc = context.clone();
	let on_pointercancel = move |_: PointerEvent| {
		context_pc.borrow_mut().pointer_cancel();
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grab");
		}
	};
	let on_pointerleave = on_pointercancel.clone();

	view! {
		<div style=move || {
			format!("position: relative; width: {}px; height: {}px;", width.get(), height.get())
		}>
			<canvas
				node_ref=canvas_ref
				class="web-graph-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointercancel=on_pointercancel
				on:pointerleave=on_pointerleave
				style="display: block; cursor: grab; touch-action: none;"
			/>
			{move || {
				selected_node
					.get()
					.map(|node| {
						view! {
							<div style="position: absolute; top: 20px; right: 20px; pointer-events: auto; z-index: 10;">
								{render_info_box.run(node)}
							</div>
						}
					})
			}}
		</div>
	}
}
