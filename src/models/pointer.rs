//! Last known pointer position.

use serde::{Deserialize, Serialize};

use super::Point;

/// Pointer position as last reported by a pointer-move event.
///
/// Absent until the first move is observed. Leaving the viewport does not
/// clear it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    position: Option<Point>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move. Every event overwrites the previous one.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.position = Some(Point::new(x, y));
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_starts_absent() {
        let pointer = PointerState::new();
        assert!(!pointer.is_present());
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_pointer_keeps_latest_move() {
        let mut pointer = PointerState::new();
        pointer.move_to(1.0, 2.0);
        pointer.move_to(30.0, 40.0);
        assert_eq!(pointer.position(), Some(Point::new(30.0, 40.0)));
    }
}
