//! Card-matching mini-game shown on the loading-failure screen.
//!
//! Sixteen cards, eight hardware symbols twice each. At most two cards are
//! face up at a time; a matched symbol stays revealed, a mismatch flips back
//! after a short display delay. Purely local state, reset by re-dealing.
use std::time::{Duration, Instant};

pub const PAIR_COUNT: usize = 8;
pub const DECK_SIZE: usize = PAIR_COUNT * 2;
pub const FLIP_DISPLAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Monitor,
    Folder,
    Disk,
    Plug,
    Mouse,
    Keyboard,
    Printer,
    Phone,
}

impl Symbol {
    pub fn all() -> [Symbol; PAIR_COUNT] {
        [
            Symbol::Monitor,
            Symbol::Folder,
            Symbol::Disk,
            Symbol::Plug,
            Symbol::Mouse,
            Symbol::Keyboard,
            Symbol::Printer,
            Symbol::Phone,
        ]
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Monitor => "🖥️",
            Symbol::Folder => "📁",
            Symbol::Disk => "💾",
            Symbol::Plug => "🔌",
            Symbol::Mouse => "🖱️",
            Symbol::Keyboard => "⌨️",
            Symbol::Printer => "🖨️",
            Symbol::Phone => "📱",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Down,
    Up(Symbol),
}

#[derive(Debug)]
pub struct MatchingGame {
    cards: [Symbol; DECK_SIZE],
    flipped: Vec<usize>,
    matched: Vec<Symbol>,
    flip_deadline: Option<Instant>,
    rng_seed: u64,
}

impl MatchingGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            cards: deck(),
            flipped: Vec::new(),
            matched: Vec::new(),
            flip_deadline: None,
            rng_seed: seed,
        };
        game.shuffle();
        game
    }

    /// Flip the card at `index`. Accepted only while fewer than two cards
    /// are up, the card is not already up, and its symbol is not matched.
    /// The second flip of a pair is evaluated immediately and arms the
    /// display delay; [`tick`](Self::tick) turns both cards back down.
    pub fn flip(&mut self, index: usize) -> bool {
        if self.flipped.len() >= 2 || index >= DECK_SIZE {
            return false;
        }
        if self.flipped.contains(&index) || self.matched.contains(&self.cards[index]) {
            return false;
        }

        self.flipped.push(index);

        if let [first, second] = self.flipped[..] {
            if self.cards[first] == self.cards[second] {
                self.matched.push(self.cards[first]);
            }
            self.flip_deadline = Some(Instant::now() + FLIP_DISPLAY);
        }

        true
    }

    /// Clears the face-up pair once the display delay has passed, match or
    /// not. Matched cards stay revealed through `matched`.
    pub fn tick(&mut self, now: Instant) {
        let Some(deadline) = self.flip_deadline else {
            return;
        };

        if now >= deadline {
            self.flipped.clear();
            self.flip_deadline = None;
        }
    }

    pub fn face(&self, index: usize) -> CardFace {
        let symbol = self.cards[index];

        if self.flipped.contains(&index) || self.matched.contains(&symbol) {
            CardFace::Up(symbol)
        } else {
            CardFace::Down
        }
    }

    pub fn flipped_count(&self) -> usize {
        self.flipped.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn is_complete(&self) -> bool {
        self.matched.len() == PAIR_COUNT
    }

    /// Re-deal. The advanced generator state gives a fresh layout.
    pub fn reset(&mut self) {
        *self = Self::new(self.rng_seed);
    }

    fn shuffle(&mut self) {
        for i in (1..DECK_SIZE).rev() {
            let j = self.rng_next_u32() as usize % (i + 1);
            self.cards.swap(i, j);
        }
    }

    fn rng_next_u32(&mut self) -> u32 {
        self.rng_seed = self
            .rng_seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        (self.rng_seed >> 11) as u32
    }
}

impl Default for MatchingGame {
    fn default() -> Self {
        Self::new(0x9E37_79B9_7F4A_7C15)
    }
}

fn deck() -> [Symbol; DECK_SIZE] {
    let mut cards = [Symbol::Monitor; DECK_SIZE];
    for (i, symbol) in Symbol::all().into_iter().enumerate() {
        cards[i] = symbol;
        cards[i + PAIR_COUNT] = symbol;
    }
    cards
}
