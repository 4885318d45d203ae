//! Screen-space value types for draggable elements
//!
//! Provides the 2-D position persisted for the collapsed ball and the
//! rectangle type used for bounding constraints and handle regions.

use serde::{Deserialize, Serialize};

/// Screen offset of a draggable element, in host coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

impl Position {
    /// Origin position
    pub const ZERO: Position = Position { x: 0.0, y: 0.0 };

    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Move this position partway toward a target
    ///
    /// `factor` of 1.0 snaps to the target, 0.0 stays put. Used by the
    /// panel's damping sink with a factor of 0.5.
    pub fn toward(self, target: Position, factor: f64) -> Position {
        Position {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Axis-aligned rectangle used for bounding constraints and handle regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Top-left corner
    pub min: Position,
    /// Bottom-right corner
    pub max: Position,
}

impl Bounds {
    /// Bounds anchored at the origin with the given extent
    pub fn from_extent(width: f64, height: f64) -> Self {
        Self {
            min: Position::ZERO,
            max: Position::new(width, height),
        }
    }

    /// Clamp a position into this rectangle
    pub fn clamp(&self, p: Position) -> Position {
        Position {
            x: p.x.clamp(self.min.x, self.max.x),
            y: p.y.clamp(self.min.y, self.max.y),
        }
    }

    /// Check whether a position falls inside this rectangle
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Translate the rectangle by an offset
    pub fn offset(&self, by: Position) -> Bounds {
        Bounds {
            min: Position::new(self.min.x + by.x, self.min.y + by.y),
            max: Position::new(self.max.x + by.x, self.max.y + by.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toward_halfway() {
        let p = Position::ZERO.toward(Position::new(100.0, 100.0), 0.5);
        assert_eq!(p, Position::new(50.0, 50.0));
    }

    #[test]
    fn test_toward_converges() {
        let p = Position::new(50.0, 50.0).toward(Position::new(100.0, 100.0), 0.5);
        assert_eq!(p, Position::new(75.0, 75.0));
    }

    #[test]
    fn test_clamp_inside_unchanged() {
        let bounds = Bounds::from_extent(800.0, 600.0);
        let p = Position::new(20.0, 20.0);
        assert_eq!(bounds.clamp(p), p);
    }

    #[test]
    fn test_clamp_outside() {
        let bounds = Bounds::from_extent(800.0, 600.0);
        assert_eq!(
            bounds.clamp(Position::new(-5.0, 700.0)),
            Position::new(0.0, 600.0)
        );
    }

    #[test]
    fn test_contains_and_offset() {
        let handle = Bounds::from_extent(440.0, 40.0);
        assert!(handle.contains(Position::new(10.0, 10.0)));
        assert!(!handle.contains(Position::new(10.0, 50.0)));

        let moved = handle.offset(Position::new(100.0, 100.0));
        assert!(moved.contains(Position::new(110.0, 110.0)));
        assert!(!moved.contains(Position::new(10.0, 10.0)));
    }

    #[test]
    fn test_position_serialization() {
        let p = Position::new(20.0, 20.0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"x\":20.0"));
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
