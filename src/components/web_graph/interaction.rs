//! Pointer interaction: node dragging and selection.
//!
//! Pointer events drive a small state machine:
//!
//! ```text
//!            down on node                 up (travel <= tolerance) -> toggle selection
//!   Idle ───────────────────► Dragging(n) ──────────────────────────► Idle
//!    │  ▲                      │ move: pin n under pointer
//!    │  │ up (no travel)       │ up / leave: unpin n
//!    │  │ -> clear selection   ▼
//!    └──► PressingBackground   Idle
//! ```
//!
//! Entering a drag pins the node where it is and keeps the simulation warm;
//! leaving it unpins the node and lets the energy decay. The node keeps its
//! offset from the pointer while dragged. All writes go through [`PinHandle`],
//! so the controller can never move anything but pins.

use rand::Rng;

use super::session::{GraphSource, SessionChange, SimulationSession};
use super::simulation::{PinHandle, Simulation};
use super::types::GraphNode;

/// An in-progress drag of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	/// Arena index of the dragged node.
	pub node: usize,
	pub active: bool,
	origin: (f64, f64),
	/// Node center minus the press point, kept while dragging.
	grab_offset: (f64, f64),
	travelled: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum Phase {
	#[default]
	Idle,
	Dragging(DragState),
	PressingBackground {
		origin: (f64, f64),
		travelled: bool,
	},
}

/// Selection after a pointer release changed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
	Selected(String),
	Cleared,
}

/// Tracks the selected node and any drag in progress.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	phase: Phase,
	selected: Option<String>,
	click_tolerance: f64,
}

impl InteractionController {
	pub fn new(click_tolerance: f64) -> Self {
		Self {
			phase: Phase::Idle,
			selected: None,
			click_tolerance,
		}
	}

	/// Id of the selected node.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// The drag in progress, if any.
	pub fn drag(&self) -> Option<&DragState> {
		match &self.phase {
			Phase::Dragging(drag) => Some(drag),
			_ => None,
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.drag().is_some()
	}

	/// Pointer pressed at `(x, y)`; `hit` is the node under the pointer.
	pub fn pointer_down(&mut self, hit: Option<usize>, x: f64, y: f64, pins: &mut PinHandle<'_>) {
		self.cancel(pins);

		let Some((node, (nx, ny))) = hit.and_then(|i| pins.position(i).map(|p| (i, p))) else {
			self.phase = Phase::PressingBackground {
				origin: (x, y),
				travelled: false,
			};
			return;
		};

		pins.pin(node, nx, ny);
		pins.warm();
		self.phase = Phase::Dragging(DragState {
			node,
			active: true,
			origin: (x, y),
			grab_offset: (nx - x, ny - y),
			travelled: false,
		});
	}

	/// Pointer moved to `(x, y)`. Returns `true` while a node is being dragged.
	pub fn pointer_move(&mut self, x: f64, y: f64, pins: &mut PinHandle<'_>) -> bool {
		let tolerance = self.click_tolerance;
		match &mut self.phase {
			Phase::Dragging(drag) => {
				drag.travelled |= exceeds(drag.origin, (x, y), tolerance);
				let (ox, oy) = drag.grab_offset;
				pins.pin(drag.node, x + ox, y + oy);
				true
			}
			Phase::PressingBackground { origin, travelled } => {
				*travelled |= exceeds(*origin, (x, y), tolerance);
				false
			}
			Phase::Idle => false,
		}
	}

	/// Pointer released at `(x, y)`. Returns the selection change a click caused.
	pub fn pointer_up(&mut self, x: f64, y: f64, pins: &mut PinHandle<'_>) -> Option<SelectionChange> {
		let tolerance = self.click_tolerance;
		match std::mem::take(&mut self.phase) {
			Phase::Dragging(drag) => {
				pins.unpin(drag.node);
				pins.settle();
				if drag.travelled || exceeds(drag.origin, (x, y), tolerance) {
					return None;
				}
				let id = pins.id(drag.node)?.to_string();
				Some(self.toggle(id))
			}
			Phase::PressingBackground { origin, travelled } => {
				if travelled || exceeds(origin, (x, y), tolerance) || self.selected.is_none() {
					return None;
				}
				self.selected = None;
				Some(SelectionChange::Cleared)
			}
			Phase::Idle => None,
		}
	}

	/// Pointer left the surface or was cancelled: ends any drag without a click.
	pub fn cancel(&mut self, pins: &mut PinHandle<'_>) {
		if let Phase::Dragging(drag) = std::mem::take(&mut self.phase) {
			pins.unpin(drag.node);
			pins.settle();
		}
	}

	/// Record of the selected node in `sim`, if it is still there.
	pub fn selected_node(&self, sim: &Simulation) -> Option<GraphNode> {
		let index = sim.index_of(self.selected()?)?;
		sim.node(index).cloned()
	}

	/// Brings `session` in line with `source`.
	///
	/// A drag in progress is cancelled before any data swap since arena indices
	/// do not survive it. The selection outlives a refresh only if its id does.
	pub fn sync_session<R: Rng>(
		&mut self,
		session: &mut SimulationSession,
		source: Option<&GraphSource>,
		rng: &mut R,
	) -> SessionChange {
		if !session.is_current(source) {
			if let Some(sim) = session.simulation_mut() {
				self.cancel(&mut sim.pins());
			}
		}

		let change = session.sync(source, rng);
		let keep = match change {
			SessionChange::Created | SessionChange::Discarded => false,
			SessionChange::Refreshed => session
				.simulation()
				.is_some_and(|sim| self.selected_node(sim).is_some()),
			SessionChange::Unchanged => true,
		};
		if !keep {
			self.reset();
		}
		change
	}

	/// Forgets selection and drag, e.g. after the graph was replaced.
	pub fn reset(&mut self) {
		self.phase = Phase::Idle;
		self.selected = None;
	}

	fn toggle(&mut self, id: String) -> SelectionChange {
		if self.selected.as_deref() == Some(id.as_str()) {
			self.selected = None;
			SelectionChange::Cleared
		} else {
			self.selected = Some(id.clone());
			SelectionChange::Selected(id)
		}
	}
}

fn exceeds(origin: (f64, f64), point: (f64, f64), tolerance: f64) -> bool {
	(point.0 - origin.0).hypot(point.1 - origin.1) > tolerance
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;
	use serde_json::Map;

	use super::super::config::{LayoutConfig, Viewport};
	use super::super::types::{GraphEdge, GraphInput, NormalizedGraph};
	use super::*;

	fn node(id: &str, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			x,
			y,
			size: 10.0,
			score: 0.2,
			title: format!("Node{id}"),
			link: String::new(),
			color: None,
			fx: None,
			fy: None,
			extra: Map::new(),
		}
	}

	fn sim() -> Simulation {
		Simulation::new(
			NormalizedGraph {
				nodes: vec![node("1", 200.0, 200.0), node("2", 400.0, 300.0)],
				edges: vec![GraphEdge {
					source: "1".into(),
					target: "2".into(),
				}],
			},
			Viewport::default(),
			LayoutConfig::default(),
		)
	}

	fn click(ctl: &mut InteractionController, sim: &mut Simulation, x: f64, y: f64) -> Option<SelectionChange> {
		let hit = sim.node_at(x, y);
		ctl.pointer_down(hit, x, y, &mut sim.pins());
		ctl.pointer_up(x, y, &mut sim.pins())
	}

	#[test]
	fn test_click_toggles_selection() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);

		assert_eq!(click(&mut ctl, &mut sim, 200.0, 200.0), Some(SelectionChange::Selected("1".into())));
		assert_eq!(ctl.selected(), Some("1"));
		assert_eq!(click(&mut ctl, &mut sim, 400.0, 300.0), Some(SelectionChange::Selected("2".into())));
		assert_eq!(click(&mut ctl, &mut sim, 401.0, 301.0), Some(SelectionChange::Cleared));
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn test_background_click_clears_selection() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);
		click(&mut ctl, &mut sim, 200.0, 200.0);

		assert_eq!(click(&mut ctl, &mut sim, 700.0, 50.0), Some(SelectionChange::Cleared));
		assert_eq!(click(&mut ctl, &mut sim, 700.0, 50.0), None);
	}

	#[test]
	fn test_drag_pins_then_releases() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);

		let hit = sim.node_at(200.0, 200.0);
		ctl.pointer_down(hit, 200.0, 200.0, &mut sim.pins());
		assert_eq!(sim.nodes()[0].fx, Some(200.0));
		assert_eq!(sim.nodes()[0].fy, Some(200.0));
		assert_eq!(sim.alpha_target(), 0.3);
		assert!(ctl.drag().is_some_and(|d| d.active && d.node == 0));

		assert!(ctl.pointer_move(260.0, 150.0, &mut sim.pins()));
		sim.tick();
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (260.0, 150.0));

		assert_eq!(ctl.pointer_up(260.0, 150.0, &mut sim.pins()), None);
		assert!(!sim.nodes()[0].is_pinned());
		assert_eq!(sim.alpha_target(), 0.0);
		assert!(!ctl.is_dragging());
	}

	#[test]
	fn test_off_center_grab_keeps_offset() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);

		ctl.pointer_down(sim.node_at(206.0, 197.0), 206.0, 197.0, &mut sim.pins());
		assert_eq!((sim.nodes()[0].fx, sim.nodes()[0].fy), (Some(200.0), Some(200.0)));

		ctl.pointer_move(266.0, 147.0, &mut sim.pins());
		sim.tick();
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (260.0, 150.0));
		ctl.pointer_up(266.0, 147.0, &mut sim.pins());
	}

	#[test]
	fn test_selected_node_follows_layout() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);
		assert_eq!(ctl.selected_node(&sim), None);
		click(&mut ctl, &mut sim, 400.0, 300.0);

		let before = ctl.selected_node(&sim).unwrap();
		for _ in 0..30 {
			sim.tick();
		}
		let after = ctl.selected_node(&sim).unwrap();
		assert_eq!(after.id, "2");
		assert_eq!((after.x, after.y), (sim.nodes()[1].x, sim.nodes()[1].y));
		assert_ne!((after.x, after.y), (before.x, before.y));
	}

	#[test]
	fn test_drag_keeps_selection() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);
		click(&mut ctl, &mut sim, 200.0, 200.0);

		ctl.pointer_down(sim.node_at(400.0, 300.0), 400.0, 300.0, &mut sim.pins());
		ctl.pointer_move(450.0, 320.0, &mut sim.pins());
		assert_eq!(ctl.pointer_up(450.0, 320.0, &mut sim.pins()), None);
		assert_eq!(ctl.selected(), Some("1"));
	}

	#[test]
	fn test_drag_back_to_origin_is_not_a_click() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);

		ctl.pointer_down(sim.node_at(200.0, 200.0), 200.0, 200.0, &mut sim.pins());
		ctl.pointer_move(300.0, 200.0, &mut sim.pins());
		ctl.pointer_move(200.0, 200.0, &mut sim.pins());
		assert_eq!(ctl.pointer_up(200.0, 200.0, &mut sim.pins()), None);
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn test_cancel_unpins_without_selecting() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);

		ctl.pointer_down(sim.node_at(400.0, 300.0), 400.0, 300.0, &mut sim.pins());
		ctl.cancel(&mut sim.pins());
		assert!(!sim.nodes()[1].is_pinned());
		assert_eq!(ctl.pointer_up(400.0, 300.0, &mut sim.pins()), None);
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn test_move_without_press_is_ignored() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);
		assert!(!ctl.pointer_move(10.0, 10.0, &mut sim.pins()));
		assert!(sim.nodes().iter().all(|n| !n.is_pinned()));
	}

	#[test]
	fn test_reset_clears_state() {
		let mut sim = sim();
		let mut ctl = InteractionController::new(3.0);
		click(&mut ctl, &mut sim, 200.0, 200.0);
		ctl.reset();
		assert_eq!(ctl.selected(), None);
		assert!(!ctl.is_dragging());
	}

	fn source(name: &str, json: &str) -> GraphSource {
		GraphSource::new(name, GraphInput::from_json(json).unwrap())
	}

	fn press_release(ctl: &mut InteractionController, session: &mut SimulationSession, x: f64, y: f64) {
		let sim = session.simulation_mut().unwrap();
		ctl.pointer_down(sim.node_at(x, y), x, y, &mut sim.pins());
		ctl.pointer_up(x, y, &mut sim.pins());
	}

	#[test]
	fn test_data_swap_cancels_drag_and_keeps_surviving_selection() {
		let mut rng = SmallRng::seed_from_u64(9);
		let mut session = SimulationSession::new(Viewport::default(), LayoutConfig::default());
		let mut ctl = InteractionController::new(3.0);
		let first = source(
			"web",
			r#"{"nodes":[{"id":"1","x":100,"y":100,"size":10},{"id":"2","x":300,"y":100,"size":10}],"edges":[]}"#,
		);
		assert_eq!(ctl.sync_session(&mut session, Some(&first), &mut rng), SessionChange::Created);

		press_release(&mut ctl, &mut session, 100.0, 100.0);
		assert_eq!(ctl.selected(), Some("1"));
		{
			let sim = session.simulation_mut().unwrap();
			ctl.pointer_down(sim.node_at(300.0, 100.0), 300.0, 100.0, &mut sim.pins());
		}
		assert!(ctl.is_dragging());

		let refreshed = first.refreshed(
			GraphInput::from_json(
				r#"{"nodes":[{"id":"1","x":100,"y":100,"size":10},{"id":"3","x":300,"y":100,"size":10}],"edges":[]}"#,
			)
			.unwrap(),
		);
		assert_eq!(ctl.sync_session(&mut session, Some(&refreshed), &mut rng), SessionChange::Refreshed);
		assert!(!ctl.is_dragging());
		assert!(session.simulation().unwrap().nodes().iter().all(|n| !n.is_pinned()));
		assert_eq!(ctl.selected(), Some("1"));
		let node = ctl.selected_node(session.simulation().unwrap()).unwrap();
		assert_eq!(node.id, "1");

		let without = refreshed.refreshed(
			GraphInput::from_json(r#"{"nodes":[{"id":"3","x":300,"y":100}],"edges":[]}"#).unwrap(),
		);
		assert_eq!(ctl.sync_session(&mut session, Some(&without), &mut rng), SessionChange::Refreshed);
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn test_same_source_keeps_drag_and_new_source_resets() {
		let mut rng = SmallRng::seed_from_u64(10);
		let mut session = SimulationSession::new(Viewport::default(), LayoutConfig::default());
		let mut ctl = InteractionController::new(3.0);
		let first = source("a", r#"{"nodes":[{"id":"1","x":100,"y":100,"size":10}],"edges":[]}"#);
		ctl.sync_session(&mut session, Some(&first), &mut rng);

		press_release(&mut ctl, &mut session, 100.0, 100.0);
		{
			let sim = session.simulation_mut().unwrap();
			ctl.pointer_down(sim.node_at(100.0, 100.0), 100.0, 100.0, &mut sim.pins());
		}
		assert_eq!(ctl.sync_session(&mut session, Some(&first), &mut rng), SessionChange::Unchanged);
		assert!(ctl.is_dragging());
		assert_eq!(ctl.selected(), Some("1"));

		let other = source("b", r#"{"nodes":[{"id":"1","x":100,"y":100,"size":10}],"edges":[]}"#);
		assert_eq!(ctl.sync_session(&mut session, Some(&other), &mut rng), SessionChange::Created);
		assert!(!ctl.is_dragging());
		assert_eq!(ctl.selected(), None);

		assert_eq!(ctl.sync_session(&mut session, None, &mut rng), SessionChange::Discarded);
		assert!(session.simulation().is_none());
	}
}
