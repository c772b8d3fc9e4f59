//! Bitset recording which argv positions have been consumed.

/// Default number of argv positions a ledger tracks.
pub const MAX_CLI_ARGS: usize = 128;

const WORD_BITS: usize = u32::BITS as usize;

#[derive(Debug, Clone)]
pub struct Ledger {
    bits: Vec<u32>,
    capacity: usize,
}

impl Ledger {
    pub fn new(capacity: usize) -> Self {
        Ledger {
            bits: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Positions at or past the capacity are ignored.
    pub fn mark(&mut self, position: usize) {
        if position < self.capacity {
            self.bits[position / WORD_BITS] |= 1 << (position % WORD_BITS);
        }
    }

    pub fn is_marked(&self, position: usize) -> bool {
        position < self.capacity
            && self.bits[position / WORD_BITS] & (1 << (position % WORD_BITS)) != 0
    }

    /// Unmarked positions in `1..argc`.
    pub fn unmarked(&self, argc: usize) -> impl Iterator<Item = usize> + '_ {
        (1..argc.min(self.capacity)).filter(move |&p| !self.is_marked(p))
    }

    pub fn reset(&mut self) {
        self.bits.fill(0);
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new(MAX_CLI_ARGS)
    }
}
