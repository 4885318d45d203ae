//! Generic drag-to-reposition behavior
//!
//! A surface follows the pointer through a position sink: every movement
//! increment reports the clamped target, and the sink answers with the
//! position the surface actually adopts. The ball commits reported
//! positions verbatim and persists them; the panel damps toward them.

use tracing::debug;

use crate::store::PositionStore;

use super::geometry::{Bounds, Position};

/// Receives reported drag positions and decides the committed one
pub trait PositionSink {
    /// Apply a reported position, returning the position to adopt
    fn apply(&mut self, reported: Position) -> Position;
}

/// Sink that adopts positions verbatim and writes each through to storage
pub struct WriteThroughSink {
    store: PositionStore,
}

impl WriteThroughSink {
    pub fn new(store: PositionStore) -> Self {
        Self { store }
    }
}

impl PositionSink for WriteThroughSink {
    fn apply(&mut self, reported: Position) -> Position {
        self.store.save(reported);
        reported
    }
}

/// Sink that moves partway toward each reported position instead of snapping
pub struct SmoothingSink {
    current: Position,
    factor: f64,
}

impl SmoothingSink {
    /// Damping factor used by the open panel
    pub const PANEL_FACTOR: f64 = 0.5;

    pub fn new(initial: Position, factor: f64) -> Self {
        Self {
            current: initial,
            factor,
        }
    }
}

impl PositionSink for SmoothingSink {
    fn apply(&mut self, reported: Position) -> Position {
        self.current = self.current.toward(reported, self.factor);
        self.current
    }
}

/// Drag-to-reposition behavior for one movable element
///
/// `handle`, when set, restricts which sub-region of the surface may
/// initiate a drag (the panel drags only by its title bar). `bounds`, when
/// set, keeps the reported position inside a parent rectangle.
pub struct DraggableSurface<S: PositionSink> {
    position: Position,
    sink: S,
    bounds: Option<Bounds>,
    handle: Option<Bounds>,
    grab: Option<Position>,
}

impl<S: PositionSink> DraggableSurface<S> {
    /// Create a surface at an initial position
    pub fn new(initial: Position, sink: S) -> Self {
        Self {
            position: initial,
            sink,
            bounds: None,
            handle: None,
            grab: None,
        }
    }

    /// Constrain reported positions to a parent rectangle
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Restrict drag initiation to a sub-region, relative to the surface origin
    pub fn with_handle(mut self, handle: Bounds) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Current committed position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Start a drag at the given pointer position
    ///
    /// Returns false without grabbing when the pointer misses the handle
    /// region.
    pub fn begin_drag(&mut self, pointer: Position) -> bool {
        if let Some(handle) = self.handle {
            if !handle.offset(self.position).contains(pointer) {
                return false;
            }
        }

        self.grab = Some(Position::new(
            pointer.x - self.position.x,
            pointer.y - self.position.y,
        ));
        debug!(%pointer, "drag started");
        true
    }

    /// Report a pointer movement, updating the committed position
    ///
    /// Ignored when no drag is in progress. The sink sees every increment,
    /// not only the release.
    pub fn drag_to(&mut self, pointer: Position) {
        let Some(grab) = self.grab else {
            return;
        };

        let mut target = Position::new(pointer.x - grab.x, pointer.y - grab.y);
        if let Some(bounds) = self.bounds {
            target = bounds.clamp(target);
        }

        self.position = self.sink.apply(target);
    }

    /// Release the current drag, if any
    pub fn end_drag(&mut self) {
        if self.grab.take().is_some() {
            debug!(position = %self.position, "drag ended");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore, POSITION_KEY};
    use std::sync::{Arc, Mutex};

    const BALL_DEFAULT: Position = Position { x: 20.0, y: 20.0 };

    /// Shared in-memory backend so tests can inspect what was persisted
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, crate::store::PersistenceError> {
            self.0.lock().unwrap().get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), crate::store::PersistenceError> {
            self.0.lock().unwrap().set_item(key, value)
        }
    }

    fn persisted(backing: &SharedStore) -> Option<Position> {
        backing
            .0
            .lock()
            .unwrap()
            .get_item(POSITION_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    fn ball() -> (DraggableSurface<WriteThroughSink>, SharedStore) {
        let backing = SharedStore::default();
        let store = PositionStore::new(Box::new(backing.clone()), BALL_DEFAULT);
        (
            DraggableSurface::new(BALL_DEFAULT, WriteThroughSink::new(store))
                .with_bounds(Bounds::from_extent(800.0, 600.0)),
            backing,
        )
    }

    #[test]
    fn test_ball_write_through() {
        let (mut ball, backing) = ball();

        assert!(ball.begin_drag(Position::new(25.0, 25.0)));
        ball.drag_to(Position::new(105.0, 65.0));
        ball.drag_to(Position::new(205.0, 145.0));
        ball.end_drag();

        // Grab offset was (5, 5); the last report lands at (200, 140).
        assert_eq!(ball.position(), Position::new(200.0, 140.0));
        assert_eq!(persisted(&backing), Some(Position::new(200.0, 140.0)));
    }

    #[test]
    fn test_ball_persists_every_increment() {
        let (mut ball, backing) = ball();

        assert!(ball.begin_drag(BALL_DEFAULT));
        ball.drag_to(Position::new(60.0, 60.0));
        assert_eq!(persisted(&backing), Some(Position::new(60.0, 60.0)));
        ball.drag_to(Position::new(90.0, 30.0));
        assert_eq!(persisted(&backing), Some(Position::new(90.0, 30.0)));
    }

    #[test]
    fn test_ball_clamped_to_bounds() {
        let (mut ball, backing) = ball();

        assert!(ball.begin_drag(BALL_DEFAULT));
        ball.drag_to(Position::new(900.0, -50.0));

        assert_eq!(ball.position(), Position::new(800.0, 0.0));
        assert_eq!(persisted(&backing), Some(Position::new(800.0, 0.0)));
    }

    #[test]
    fn test_move_without_grab_ignored() {
        let (mut ball, backing) = ball();

        ball.drag_to(Position::new(300.0, 300.0));
        assert_eq!(ball.position(), BALL_DEFAULT);
        assert_eq!(persisted(&backing), None);
    }

    #[test]
    fn test_panel_smoothing_converges() {
        let sink = SmoothingSink::new(Position::ZERO, SmoothingSink::PANEL_FACTOR);
        let mut panel = DraggableSurface::new(Position::ZERO, sink);

        assert!(panel.begin_drag(Position::ZERO));
        panel.drag_to(Position::new(100.0, 100.0));
        assert_eq!(panel.position(), Position::new(50.0, 50.0));
        panel.drag_to(Position::new(100.0, 100.0));
        assert_eq!(panel.position(), Position::new(75.0, 75.0));
    }

    #[test]
    fn test_panel_handle_region() {
        let sink = SmoothingSink::new(Position::ZERO, SmoothingSink::PANEL_FACTOR);
        let mut panel = DraggableSurface::new(Position::new(100.0, 100.0), sink)
            .with_handle(Bounds::from_extent(440.0, 40.0));

        // Below the title bar: no grab.
        assert!(!panel.begin_drag(Position::new(120.0, 200.0)));
        assert!(!panel.is_dragging());

        // Inside the title bar: grab.
        assert!(panel.begin_drag(Position::new(120.0, 110.0)));
        assert!(panel.is_dragging());
        panel.end_drag();
        assert!(!panel.is_dragging());
    }
}
