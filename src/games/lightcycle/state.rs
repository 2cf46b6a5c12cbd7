use crate::game::traits::{GameError, PlayerId};
use super::controllers::Controller;

/// A position on the grid, or a unit step between positions.
///
/// (0,0) is the top-left corner,
/// x increases to the right, y increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        *self + direction.to_vector()
    }

    pub fn distance(&self, other: &Vector) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

impl std::ops::Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn to_vector(&self) -> Vector {
        let (dx, dy) = self.delta();
        Vector::new(dx, dy)
    }

    /// Only the four cardinal unit vectors map back to a direction.
    pub fn from_vector(v: Vector) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.to_vector() == v)
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.get_opposite() == *other
    }

    pub fn get_opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Quarter turn counter-clockwise as seen on screen.
    pub fn turn_left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Square {
    #[default]
    Open,
    Wall,
    /// Trail or head of a player
    Owned(PlayerId),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width of the grid
    width: u32,
    /// Height of the grid
    height: u32,
    /// Row-major cell data
    cells: Vec<Square>,
}

impl Grid {
    /// An all-open grid with no border.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Square::Open; width as usize * height as usize],
        }
    }

    /// An open interior surrounded by a permanent wall.
    pub fn bordered(width: u32, height: u32) -> Self {
        let mut grid = Self::new(width, height);
        let (w, h) = (width as usize, height as usize);
        for index in 0..grid.cells.len() {
            let (x, y) = (index % w, index / w);
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                grid.cells[index] = Square::Wall;
            }
        }
        grid
    }

    /// Parses a map drawn with `#` for walls and `.` for open cells.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GameError::InvalidInput("empty map".to_string()));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GameError::InvalidInput(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for c in row.chars() {
                let square = match c {
                    '#' => Square::Wall,
                    '.' => Square::Open,
                    other => {
                        return Err(GameError::InvalidInput(format!(
                            "unknown map cell '{}' in row {}",
                            other, y
                        )));
                    }
                };
                cells.push(square);
            }
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            cells,
        })
    }

    pub fn get_grid_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: &Vector) -> bool {
        cell_index(self.width, self.height, pos).is_some()
    }

    pub fn index_of(&self, pos: &Vector) -> Option<usize> {
        cell_index(self.width, self.height, pos)
    }

    pub fn pos_of(&self, index: usize) -> Option<Vector> {
        if index < self.cells.len() {
            let width = self.width as usize;
            Some(Vector::new((index % width) as i32, (index / width) as i32))
        } else {
            None
        }
    }

    pub fn get(&self, pos: &Vector) -> Option<Square> {
        self.index_of(pos).map(|idx| self.cells[idx])
    }

    /// Out-of-bounds writes are ignored, and walls are never overwritten.
    pub fn set(&mut self, pos: &Vector, square: Square) {
        if let Some(idx) = self.index_of(pos) {
            if self.cells[idx] != Square::Wall {
                self.cells[idx] = square;
            }
        }
    }

    pub fn is_open(&self, pos: &Vector) -> bool {
        self.get(pos) == Some(Square::Open)
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Square::Open).count()
    }

    pub fn count_owned_by(&self, player_id: PlayerId) -> usize {
        self.cells.iter().filter(|&&c| c == Square::Owned(player_id)).count()
    }

    pub fn cells(&self) -> &[Square] {
        &self.cells
    }
}

/// Row-major index of `pos` in a `width × height` layout, `None` off the grid.
pub(crate) fn cell_index(width: u32, height: u32, pos: &Vector) -> Option<usize> {
    if pos.x < 0 || pos.y < 0 || pos.x as u32 >= width || pos.y as u32 >= height {
        return None;
    }
    Some(pos.y as usize * width as usize + pos.x as usize)
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("open_cells", &self.open_count())
            .finish()
    }
}

pub struct Player {
    /// Dense identifier, 1-based, stable for the whole game
    pub id: PlayerId,
    /// Whether the player is still moving
    pub alive: bool,
    /// Current head position, always the last trail entry
    pub position: Vector,
    /// Current movement direction
    pub heading: Direction,
    /// Every cell occupied so far, in order
    pub trail: Vec<Vector>,
    /// Decision source; `None` on sandbox copies
    pub controller: Option<Box<dyn Controller>>,
}

impl Player {
    pub fn new(id: PlayerId, position: Vector, heading: Direction, controller: Box<dyn Controller>) -> Self {
        Self {
            id,
            alive: true,
            position,
            heading,
            trail: vec![position],
            controller: Some(controller),
        }
    }

    /// A player with no controller attached, holding its heading on every tick.
    pub fn unbound(id: PlayerId, position: Vector, heading: Direction) -> Self {
        Self {
            id,
            alive: true,
            position,
            heading,
            trail: vec![position],
            controller: None,
        }
    }

    pub fn controller_name(&self) -> String {
        self.controller
            .as_ref()
            .map(|c| c.name())
            .unwrap_or_else(|| "unbound".to_string())
    }
}

/// Copies position, liveness and trail. Controllers are not copied.
impl Clone for Player {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            alive: self.alive,
            position: self.position,
            heading: self.heading,
            trail: self.trail.clone(),
            controller: None,
        }
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("alive", &self.alive)
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("trail_len", &self.trail.len())
            .field("controller", &self.controller_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_operations() {
        let pos = Vector::new(5, 10);
        assert_eq!(pos.offset(1, -1), Vector::new(6, 9));
        assert_eq!(pos.moved(Direction::Up), Vector::new(5, 9));
        assert_eq!(pos.moved(Direction::Right), Vector::new(6, 10));
        assert_eq!(pos - Vector::new(5, 9), Direction::Down.to_vector());
    }

    #[test]
    fn test_vector_distance() {
        let a = Vector::new(0, 0);
        let b = Vector::new(3, 4);
        assert_eq!(a.distance(&b), 7); // Manhattan distance
    }

    #[test]
    fn test_direction_vectors() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
        for d in Direction::ALL {
            assert_eq!(Direction::from_vector(d.to_vector()), Some(d));
        }
        assert_eq!(Direction::from_vector(Vector::new(1, 1)), None);
        assert_eq!(Direction::from_vector(Vector::new(0, 0)), None);
    }

    #[test]
    fn test_direction_turns() {
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(Direction::Left.is_opposite(&Direction::Right));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        for d in Direction::ALL {
            assert_eq!(d.turn_left().turn_right(), d);
            assert_eq!(d.turn_left().turn_left(), d.get_opposite());
        }
        assert_eq!(Direction::Up.turn_left(), Direction::Left);
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
    }

    #[test]
    fn test_bordered_grid() {
        let grid = Grid::bordered(6, 5);
        assert_eq!(grid.get_grid_dimensions(), (6, 5));
        assert_eq!(grid.get(&Vector::new(0, 0)), Some(Square::Wall));
        assert_eq!(grid.get(&Vector::new(5, 2)), Some(Square::Wall));
        assert_eq!(grid.get(&Vector::new(2, 4)), Some(Square::Wall));
        assert_eq!(grid.get(&Vector::new(1, 1)), Some(Square::Open));
        assert_eq!(grid.open_count(), 4 * 3);
        assert_eq!(grid.get(&Vector::new(-1, 0)), None);
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(7, 4);
        for index in 0..grid.len() {
            let pos = grid.pos_of(index).unwrap();
            assert_eq!(grid.index_of(&pos), Some(index));
        }
        for y in 0..4 {
            for x in 0..7 {
                let pos = Vector::new(x, y);
                let index = grid.index_of(&pos).unwrap();
                assert_eq!(grid.pos_of(index), Some(pos));
            }
        }
        assert_eq!(grid.pos_of(grid.len()), None);
        assert_eq!(grid.index_of(&Vector::new(7, 0)), None);
    }

    #[test]
    fn test_wide_grid_indexes_in_usize() {
        let grid = Grid::bordered(70_000, 3);
        assert_eq!(grid.len(), 210_000);
        let far = Vector::new(69_998, 1);
        assert_eq!(grid.index_of(&far), Some(70_000 + 69_998));
        assert_eq!(grid.pos_of(70_000 + 69_998), Some(far));
        assert!(grid.is_open(&far));
        assert_eq!(grid.get(&Vector::new(69_999, 1)), Some(Square::Wall));
        assert_eq!(cell_index(70_000, 70_000, &Vector::new(69_999, 69_999)), Some(4_899_999_999));
    }

    #[test]
    fn test_walls_are_permanent() {
        let mut grid = Grid::bordered(5, 5);
        let wall = Vector::new(0, 2);
        grid.set(&wall, Square::Open);
        assert_eq!(grid.get(&wall), Some(Square::Wall));

        let inner = Vector::new(2, 2);
        grid.set(&inner, Square::Owned(1));
        assert_eq!(grid.get(&inner), Some(Square::Owned(1)));
        assert_eq!(grid.count_owned_by(1), 1);
    }

    #[test]
    fn test_from_ascii() {
        let grid = Grid::from_ascii(&[
            "#####",
            "#..##",
            "#####",
        ]).unwrap();
        assert_eq!(grid.get_grid_dimensions(), (5, 3));
        assert_eq!(grid.open_count(), 2);
        assert!(grid.is_open(&Vector::new(2, 1)));
        assert!(!grid.is_open(&Vector::new(3, 1)));

        assert!(Grid::from_ascii(&["##", "#"]).is_err());
        assert!(Grid::from_ascii(&["#x"]).is_err());
        assert!(Grid::from_ascii(&[]).is_err());
    }

    #[test]
    fn test_player_clone_drops_controller() {
        let player = Player::unbound(1, Vector::new(2, 2), Direction::Up);
        let copy = player.clone();
        assert_eq!(copy.trail, vec![Vector::new(2, 2)]);
        assert!(copy.controller.is_none());
        assert_eq!(copy.controller_name(), "unbound");
    }
}
