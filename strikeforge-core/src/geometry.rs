use serde::{Deserialize, Serialize};

/// A point in play-field space: origin top-left, x grows right, y grows down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn opposite(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
        }
    }
}

/// Which half of the field, as seen on screen, a target sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Targets force a cross-body reach: the visual left needs the right hand.
    pub fn striking_hand(self) -> Hand {
        match self {
            Side::Left => Hand::Right,
            Side::Right => Hand::Left,
        }
    }

    fn direction(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f64,
    pub height: f64,
    unit_divisor: f64,
}

impl PlayField {
    pub const DEFAULT_UNIT_DIVISOR: f64 = 5.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self::with_unit_divisor(width, height, Self::DEFAULT_UNIT_DIVISOR)
    }

    pub fn with_unit_divisor(width: f64, height: f64, unit_divisor: f64) -> Self {
        Self {
            width,
            height,
            unit_divisor,
        }
    }

    /// Grid step used for spawn placement and the hit region size.
    pub fn unit(&self) -> f64 {
        self.height / self.unit_divisor
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Horizontal target coordinate for `side`, `offset_units` away from the centre.
    pub fn column_x(&self, side: Side, offset_units: f64) -> f64 {
        self.center_x() + side.direction() * offset_units * self.unit()
    }

    pub fn row_y(&self, row: u32) -> f64 {
        row as f64 * self.unit()
    }
}

/// Axis-aligned square, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareRegion {
    pub center: Position,
    pub side: f64,
}

impl SquareRegion {
    pub fn new(center: Position, side: f64) -> Self {
        Self { center, side }
    }

    pub fn contains(&self, point: Position) -> bool {
        let half = self.side / 2.0;
        (point.x - self.center.x).abs() <= half && (point.y - self.center.y).abs() <= half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_a_fifth_of_the_height() {
        let field = PlayField::new(640.0, 500.0);
        assert_eq!(field.unit(), 100.0);
        assert_eq!(field.center_x(), 320.0);
    }

    #[test]
    fn columns_sit_two_units_from_centre() {
        let field = PlayField::new(640.0, 500.0);
        assert_eq!(field.column_x(Side::Left, 2.0), 120.0);
        assert_eq!(field.column_x(Side::Right, 2.0), 520.0);
        assert_eq!(field.row_y(3), 300.0);
    }

    #[test]
    fn side_maps_to_the_opposite_hand() {
        assert_eq!(Side::Left.striking_hand(), Hand::Right);
        assert_eq!(Side::Right.striking_hand(), Hand::Left);
        assert_eq!(Hand::Left.opposite(), Hand::Right);
    }

    #[test]
    fn square_region_includes_its_edges() {
        let region = SquareRegion::new(Position::new(100.0, 200.0), 100.0);

        assert!(region.contains(Position::new(100.0, 200.0)));
        assert!(region.contains(Position::new(50.0, 250.0)));
        assert!(region.contains(Position::new(150.0, 150.0)));
        assert!(!region.contains(Position::new(150.5, 200.0)));
        assert!(!region.contains(Position::new(100.0, 149.0)));
    }
}
