/// Number of zeroed cells a fresh tape starts with.
pub const INITIAL_CELLS: usize = 30_000;

/// Growable memory tape with a single data pointer.
///
/// The tape grows one cell at a time when the pointer walks off its right
/// end and never shrinks. The pointer is clamped at 0 on the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<i64>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: vec![0; INITIAL_CELLS],
            pointer: 0,
        }
    }

    /// Move right, appending a zero cell if the pointer reaches the end.
    pub fn move_right(&mut self) {
        self.pointer += 1;
        if self.pointer == self.cells.len() {
            self.cells.push(0);
            tracing::debug!(len = self.cells.len(), "tape grew");
        }
    }

    /// Move left; stays at 0 instead of going negative.
    pub fn move_left(&mut self) {
        self.pointer = self.pointer.saturating_sub(1);
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    pub fn get(&self) -> i64 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: i64) {
        self.cells[self.pointer] = value;
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }
}
