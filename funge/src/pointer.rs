#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Direction::Right | Direction::Left => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
        }
    }

    #[must_use]
    pub fn sign(self) -> i8 {
        match self {
            Direction::Right | Direction::Down => 1,
            Direction::Left | Direction::Up => -1,
        }
    }
}

/// A cursor on a toroidal `width` x `height` surface.
///
/// The delta always has exactly one non-zero component, which is `1` or `-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPointer {
    position: [i64; 2],
    delta: [i8; 2],
    bounds: [i64; 2],
}

impl InstructionPointer {
    /// Starts at `(0, 0)` moving right.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::at(0, 0, Direction::Right, width, height)
    }

    #[must_use]
    pub fn at(x: i64, y: i64, direction: Direction, width: usize, height: usize) -> Self {
        let mut ip = Self {
            position: [x, y],
            delta: [0, 0],
            bounds: [width as i64, height as i64],
        };
        ip.go(direction.axis(), direction.sign());
        ip
    }

    #[must_use]
    pub fn position(&self, axis: Axis) -> i64 {
        self.position[axis.index()]
    }

    #[must_use]
    pub fn x(&self) -> usize {
        self.position[0] as usize
    }

    #[must_use]
    pub fn y(&self) -> usize {
        self.position[1] as usize
    }

    #[must_use]
    pub fn direction(&self, axis: Axis) -> i8 {
        self.delta[axis.index()]
    }

    /// Points the delta along `axis`, zeroing the other component.
    pub fn go(&mut self, axis: Axis, sign: i8) {
        self.delta = match axis {
            Axis::X => [sign, 0],
            Axis::Y => [0, sign],
        };
    }

    pub fn turn(&mut self, direction: Direction) {
        self.go(direction.axis(), direction.sign());
    }

    /// Moves one cell along the delta and wraps each axis independently.
    pub fn advance(&mut self) {
        for axis in 0..2 {
            let next = self.position[axis] + i64::from(self.delta[axis]);
            self.position[axis] = if next >= self.bounds[axis] {
                0
            } else if next < 0 {
                self.bounds[axis] - 1
            } else {
                next
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_right_edge_to_zero() {
        let mut ip = InstructionPointer::at(79, 3, Direction::Right, 80, 25);
        ip.advance();
        assert_eq!((ip.x(), ip.y()), (0, 3));
    }

    #[test]
    fn wraps_left_edge_to_last_column() {
        let mut ip = InstructionPointer::at(0, 3, Direction::Left, 80, 25);
        ip.advance();
        assert_eq!((ip.x(), ip.y()), (79, 3));
    }

    #[test]
    fn wraps_vertically() {
        let mut ip = InstructionPointer::at(5, 24, Direction::Down, 80, 25);
        ip.advance();
        assert_eq!((ip.x(), ip.y()), (5, 0));

        ip.turn(Direction::Up);
        ip.advance();
        assert_eq!((ip.x(), ip.y()), (5, 24));
    }

    #[test]
    fn go_zeroes_the_other_axis() {
        let mut ip = InstructionPointer::new(80, 25);
        assert_eq!(ip.direction(Axis::X), 1);
        ip.go(Axis::Y, -1);
        assert_eq!(ip.direction(Axis::X), 0);
        assert_eq!(ip.direction(Axis::Y), -1);
    }

    #[test]
    fn advance_moves_along_delta() {
        let mut ip = InstructionPointer::new(4, 4);
        ip.advance();
        ip.advance();
        assert_eq!(ip.position(Axis::X), 2);
        assert_eq!(ip.position(Axis::Y), 0);
    }
}
