use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, Suit};
use crate::errors::GameError;
use crate::player::Player;

/// Board side length.
pub const SIZE: usize = 10;

/// A board coordinate. Always in range once constructed through
/// [`Pos::checked`]; [`Pos::new`] is for literals the caller knows are valid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn checked(row: usize, col: usize) -> Result<Self, GameError> {
        if row < SIZE && col < SIZE {
            Ok(Self { row, col })
        } else {
            Err(GameError::OutOfRange { row, col })
        }
    }

    /// Cell reached by moving `steps` times along `(dr, dc)`, if on the board.
    pub fn offset(self, dr: isize, dc: isize, steps: isize) -> Option<Pos> {
        let row = self.row as isize + dr * steps;
        let col = self.col as isize + dc * steps;
        if (0..SIZE as isize).contains(&row) && (0..SIZE as isize).contains(&col) {
            Some(Pos::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Row-major index, the board scan order used for tie-breaks.
    pub fn scan_index(self) -> usize {
        self.row * SIZE + self.col
    }

    pub fn all() -> impl Iterator<Item = Pos> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Pos::new(row, col)))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub const CORNERS: [Pos; 4] = [
    Pos::new(0, 0),
    Pos::new(0, SIZE - 1),
    Pos::new(SIZE - 1, 0),
    Pos::new(SIZE - 1, SIZE - 1),
];

const XX: Option<Card> = None;

const fn s(rank: Rank) -> Option<Card> {
    Some(Card::new(rank, Suit::Spades))
}
const fn h(rank: Rank) -> Option<Card> {
    Some(Card::new(rank, Suit::Hearts))
}
const fn d(rank: Rank) -> Option<Card> {
    Some(Card::new(rank, Suit::Diamonds))
}
const fn c(rank: Rank) -> Option<Card> {
    Some(Card::new(rank, Suit::Clubs))
}

use Rank::{Ace, Eight, Five, Four, King, Nine, Queen, Seven, Six, Ten, Three, Two};

/// Simulator board table. Cell (8,7) holds `2H`, not a third `AS`, so every
/// non-Jack card has exactly two cells. `None` marks the four wild corners.
#[rustfmt::skip]
pub const LAYOUT: [[Option<Card>; SIZE]; SIZE] = [
    [XX,       s(Two),   s(Three), s(Four),  s(Five),  s(Six),   s(Seven), s(Eight), s(Nine),  XX      ],
    [c(Six),   c(Five),  c(Four),  c(Three), c(Two),   h(Ace),   h(King),  h(Queen), h(Ten),   s(Ten)  ],
    [c(Seven), s(Ace),   d(Two),   d(Three), d(Four),  d(Five),  d(Six),   d(Seven), h(Nine),  s(Queen)],
    [c(Eight), s(King),  c(Six),   c(Five),  c(Four),  c(Three), c(Two),   d(Eight), h(Eight), s(King) ],
    [c(Nine),  s(Queen), c(Seven), h(Six),   h(Five),  h(Four),  h(Ace),   d(Nine),  h(Seven), s(Ace)  ],
    [c(Ten),   s(Ten),   c(Eight), h(Seven), h(Two),   h(Three), h(King),  d(Ten),   h(Six),   d(Two)  ],
    [c(Queen), s(Nine),  c(Nine),  h(Eight), h(Nine),  h(Ten),   h(Queen), d(Queen), h(Five),  d(Three)],
    [c(King),  s(Eight), c(Ten),   c(Queen), c(King),  c(Ace),   d(Ace),   d(King),  h(Four),  d(Four) ],
    [c(Ace),   s(Seven), s(Six),   s(Five),  s(Four),  s(Three), s(Two),   h(Two),   h(Three), d(Five) ],
    [XX,       d(Ace),   d(King),  d(Queen), d(Ten),   d(Nine),  d(Eight), d(Seven), d(Six),   XX      ],
];

static CARD_CELLS: LazyLock<HashMap<Card, Vec<Pos>>> = LazyLock::new(|| {
    let mut index: HashMap<Card, Vec<Pos>> = HashMap::new();
    for pos in Pos::all() {
        if let Some(card) = LAYOUT[pos.row][pos.col] {
            index.entry(card).or_default().push(pos);
        }
    }
    index
});

/// Board cells showing `card`, in scan order. Two cells for every non-Jack
/// card, none for Jacks.
pub fn cells_for_card(card: Card) -> &'static [Pos] {
    CARD_CELLS.get(&card).map(Vec::as_slice).unwrap_or(&[])
}

pub fn is_corner(pos: Pos) -> bool {
    LAYOUT[pos.row][pos.col].is_none()
}

/// What sits on a cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    Empty,
    /// Corner cell, counts for both players.
    Wild,
    Chip(Player),
}

/// Read-only snapshot of one cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cell {
    pub pos: Pos,
    /// `None` for corners.
    pub card: Option<Card>,
    pub occupant: Occupant,
    pub locked: bool,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
struct Slot {
    owner: Option<Player>,
    locked: bool,
}

/// Chip occupancy over the fixed layout.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Board {
    slots: [[Slot; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        let pos = Pos::checked(row, col)?;
        Ok(self.cell(pos))
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        Cell {
            pos,
            card: self.card_at(pos),
            occupant: self.occupant(pos),
            locked: self.is_locked(pos),
        }
    }

    pub fn card_at(&self, pos: Pos) -> Option<Card> {
        LAYOUT[pos.row][pos.col]
    }

    pub fn occupant(&self, pos: Pos) -> Occupant {
        if is_corner(pos) {
            return Occupant::Wild;
        }
        match self.slot(pos).owner {
            Some(p) => Occupant::Chip(p),
            None => Occupant::Empty,
        }
    }

    pub fn owner(&self, pos: Pos) -> Option<Player> {
        self.slot(pos).owner
    }

    /// Empty and claimable. Corners are never empty.
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.occupant(pos) == Occupant::Empty
    }

    /// Part of a counted sequence. Corners always report locked.
    pub fn is_locked(&self, pos: Pos) -> bool {
        is_corner(pos) || self.slot(pos).locked
    }

    /// Owned by `player` or wild.
    pub fn counts_for(&self, pos: Pos, player: Player) -> bool {
        match self.occupant(pos) {
            Occupant::Wild => true,
            Occupant::Chip(p) => p == player,
            Occupant::Empty => false,
        }
    }

    pub fn chips(&self, player: Player) -> usize {
        Pos::all().filter(|&p| self.owner(p) == Some(player)).count()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(|&p| self.is_empty(p))
    }

    /// A copy with `player`'s chip on `pos`, for looking ahead without
    /// touching the live board.
    pub fn with_chip(&self, pos: Pos, player: Player) -> Board {
        let mut next = self.clone();
        next.place(pos, player);
        next
    }

    pub(crate) fn place(&mut self, pos: Pos, player: Player) {
        if !is_corner(pos) {
            self.slot_mut(pos).owner = Some(player);
        }
    }

    pub(crate) fn remove(&mut self, pos: Pos) -> Option<Player> {
        if is_corner(pos) {
            return None;
        }
        let slot = self.slot_mut(pos);
        slot.locked = false;
        slot.owner.take()
    }

    pub(crate) fn set_locked(&mut self, pos: Pos, locked: bool) {
        if !is_corner(pos) {
            self.slot_mut(pos).locked = locked;
        }
    }

    /// Text grid: `*` wild, `.` empty, `1`/`2` chips, `A`/`B` locked chips.
    pub fn render(&self) -> String {
        let mut out = String::from("   0 1 2 3 4 5 6 7 8 9\n");
        for row in 0..SIZE {
            out.push_str(&format!("{row:>2}"));
            for col in 0..SIZE {
                let pos = Pos::new(row, col);
                let ch = match (self.occupant(pos), self.is_locked(pos)) {
                    (Occupant::Wild, _) => '*',
                    (Occupant::Empty, _) => '.',
                    (Occupant::Chip(Player::One), false) => '1',
                    (Occupant::Chip(Player::Two), false) => '2',
                    (Occupant::Chip(Player::One), true) => 'A',
                    (Occupant::Chip(Player::Two), true) => 'B',
                };
                out.push(' ');
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn slot(&self, pos: Pos) -> &Slot {
        &self.slots[pos.row][pos.col]
    }

    fn slot_mut(&mut self, pos: Pos) -> &mut Slot {
        &mut self.slots[pos.row][pos.col]
    }
}
