//! Gesture geometry and classification.
//!
//! Coordinates follow screen convention: x grows rightward, y grows
//! downward, so an upward swipe has negative `dy`.

use serde::{Deserialize, Serialize};

/// A pointer position in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragPoint {
    pub x: f32,
    pub y: f32,
}

impl DragPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Displacement of a drag from its origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragVector {
    pub dx: f32,
    pub dy: f32,
}

impl DragVector {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Displacement from `origin` to `position`
    pub fn between(origin: DragPoint, position: DragPoint) -> Self {
        Self {
            dx: position.x - origin.x,
            dy: position.y - origin.y,
        }
    }
}

/// The four decisive swipe directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Add to the shortlist
    Right,
    /// Skip with no judgment
    Left,
    /// Save to favorites
    Up,
    /// Mark as already seen
    Down,
}

/// Classify a finished drag.
///
/// The vertical axis is checked first: a drag whose `|dy|` reaches the
/// threshold is vertical even when `|dx|` is larger. Otherwise the drag is
/// horizontal when `|dx|` reaches the threshold, and inconclusive (`None`)
/// when neither axis does.
pub fn classify(offset: DragVector, threshold: f32) -> Option<SwipeDirection> {
    if offset.dy.abs() >= threshold {
        Some(if offset.dy < 0.0 {
            SwipeDirection::Up
        } else {
            SwipeDirection::Down
        })
    } else if offset.dx.abs() >= threshold {
        Some(if offset.dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    } else {
        None
    }
}
