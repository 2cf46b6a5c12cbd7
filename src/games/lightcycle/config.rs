/// Largest grid area an arena may be built with.
pub const MAX_GRID_CELLS: u64 = 1 << 22;

#[derive(Debug, Clone)]
pub struct LightcycleConfig {
    /// Grid width in cells, border walls included
    pub grid_width: u32,
    /// Grid height in cells, border walls included
    pub grid_height: u32,
    /// Maximum number of players per arena
    pub max_players: usize,
    /// Distance of spawn slots from the border wall
    pub spawn_margin: u32,
    /// Round length cap, as a multiple of the grid area
    pub tick_cap_factor: u64,
}

impl LightcycleConfig {
    pub fn with_grid_size(width: u32, height: u32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    pub fn grid_cells(&self) -> u64 {
        self.grid_width as u64 * self.grid_height as u64
    }

    /// Ticks after which a round is cut short.
    pub fn tick_cap(&self) -> u64 {
        self.tick_cap_factor.saturating_mul(self.grid_cells())
    }

    /// Smallest side that keeps neighbouring spawn slots at least two cells
    /// apart, so no two first moves land on the same cell.
    pub fn min_side(&self) -> u32 {
        2 * (self.spawn_margin + 3)
    }
}

impl Default for LightcycleConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            max_players: 8,
            spawn_margin: 3,
            tick_cap_factor: 4,
        }
    }
}
