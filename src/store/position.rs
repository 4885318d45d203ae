//! Persisted position slot for the collapsed ball
//!
//! The ball's screen position survives restarts under a single fixed key.
//! Reads fall back to the caller's default on any failure; writes are
//! best-effort.

use tracing::warn;

use crate::surface::Position;

use super::KeyValueStore;

/// Storage key for the ball position slot
pub const POSITION_KEY: &str = "assistiveBallPosition";

/// Best-effort persistence for a single draggable position
pub struct PositionStore {
    store: Box<dyn KeyValueStore>,
    default: Position,
}

impl PositionStore {
    /// Create a position store over a key-value backend
    pub fn new(store: Box<dyn KeyValueStore>, default: Position) -> Self {
        Self { store, default }
    }

    /// Load the persisted position
    ///
    /// Absent, corrupt, or non-finite values all yield the default; the
    /// failure is logged, never propagated.
    pub fn load(&self) -> Position {
        let raw = match self.store.get_item(POSITION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.default,
            Err(e) => {
                warn!(?e, "error loading saved position");
                return self.default;
            }
        };

        match serde_json::from_str::<Position>(&raw) {
            Ok(p) if p.is_finite() => p,
            Ok(p) => {
                warn!(%p, "stored position is not finite, using default");
                self.default
            }
            Err(e) => {
                warn!(?e, "error parsing saved position");
                self.default
            }
        }
    }

    /// Persist a position, overwriting the previous slot value
    ///
    /// Write failures are logged and swallowed.
    pub fn save(&mut self, p: Position) {
        if !p.is_finite() {
            warn!(%p, "refusing to persist non-finite position");
            return;
        }

        let raw = match serde_json::to_string(&p) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(?e, "error serializing position");
                return;
            }
        };

        if let Err(e) = self.store.set_item(POSITION_KEY, &raw) {
            warn!(?e, "error saving position");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, PersistenceError};

    const BALL_DEFAULT: Position = Position { x: 20.0, y: 20.0 };

    fn store() -> PositionStore {
        PositionStore::new(Box::new(MemoryStore::new()), BALL_DEFAULT)
    }

    #[test]
    fn test_load_missing_yields_default() {
        assert_eq!(store().load(), BALL_DEFAULT);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = store();
        store.save(Position::new(120.0, 44.0));
        assert_eq!(store.load(), Position::new(120.0, 44.0));
    }

    #[test]
    fn test_corrupt_value_yields_default() {
        let mut backing = MemoryStore::new();
        backing.set_item(POSITION_KEY, "{\"x\": oops").unwrap();

        let store = PositionStore::new(Box::new(backing), BALL_DEFAULT);
        assert_eq!(store.load(), BALL_DEFAULT);
    }

    #[test]
    fn test_overflowing_value_yields_default() {
        let mut backing = MemoryStore::new();
        backing
            .set_item(POSITION_KEY, "{\"x\": 1e999, \"y\": 0.0}")
            .unwrap();

        let store = PositionStore::new(Box::new(backing), BALL_DEFAULT);
        assert_eq!(store.load(), BALL_DEFAULT);
    }

    #[test]
    fn test_save_refuses_non_finite() {
        let mut store = store();
        store.save(Position::new(f64::NAN, 0.0));
        assert_eq!(store.load(), BALL_DEFAULT);
    }

    #[test]
    fn test_read_failure_yields_default() {
        struct FailingStore;

        impl KeyValueStore for FailingStore {
            fn get_item(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
                Err(PersistenceError::Read("storage offline".into()))
            }

            fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
                Err(PersistenceError::Write("storage offline".into()))
            }
        }

        let mut store = PositionStore::new(Box::new(FailingStore), BALL_DEFAULT);
        assert_eq!(store.load(), BALL_DEFAULT);
        // Write failure is swallowed too.
        store.save(Position::new(5.0, 5.0));
    }
}
