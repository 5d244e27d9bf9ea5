use crate::characters::{random_character_index, Character};
use crate::util::random_integer;

/// Number of holes on the board, laid out 3x3 in the UI.
pub const HOLE_COUNT: usize = 9;

/// One fixed position a target can pop out of.
///
/// A hole holds at most one appearance at a time: the character bound to it
/// and whether it is currently up. `hit` flips when the player lands a whack
/// so the UI can show the hit sprite until the target retracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hole {
    pub visible: bool,
    pub hit: bool,
    pub character_index: Option<usize>,
}

impl Hole {
    pub fn character(&self) -> Option<Character> {
        self.character_index.map(Character::by_index)
    }

    fn clear(&mut self) {
        self.visible = false;
        self.hit = false;
        self.character_index = None;
    }
}

/// The 3x3 board plus the last-chosen hole index.
#[derive(Debug, Clone)]
pub struct Board {
    pub holes: [Hole; HOLE_COUNT],
    pub last_hole: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            holes: [Hole::default(); HOLE_COUNT],
            last_hole: 0,
        }
    }

    /// Picks a random hole, never the same one twice in a row, and binds a
    /// freshly drawn character to it. Returns the chosen index.
    ///
    /// Rejection sampling: redraw while the index equals the previous pick.
    /// With 9 holes the expected number of redraws is well under one.
    pub fn choose_hole(&mut self) -> usize {
        let mut index = random_integer(0, HOLE_COUNT - 1);
        while index == self.last_hole {
            index = random_integer(0, HOLE_COUNT - 1);
        }
        self.last_hole = index;
        self.assign_character(index);
        index
    }

    /// Draws a uniform random character and binds it to the hole's pending
    /// appearance. The hole starts unhit, showing the idle sprite.
    pub fn assign_character(&mut self, index: usize) {
        let hole = &mut self.holes[index];
        hole.character_index = Some(random_character_index());
        hole.hit = false;
    }

    pub fn show(&mut self, index: usize) {
        self.holes[index].visible = true;
    }

    pub fn hide(&mut self, index: usize) {
        self.holes[index].clear();
    }

    pub fn hide_all(&mut self) {
        for hole in &mut self.holes {
            hole.clear();
        }
    }

    /// Marks a live target as hit, swapping its sprite to the hit variant.
    /// Returns the character's point value, or None if nothing is up there.
    pub fn register_hit(&mut self, index: usize) -> Option<u32> {
        let hole = &mut self.holes[index];
        if !hole.visible {
            return None;
        }
        hole.hit = true;
        hole.character().map(|c| c.points)
    }

    pub fn visible_count(&self) -> usize {
        self.holes.iter().filter(|h| h.visible).count()
    }
}
