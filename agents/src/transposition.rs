use battle_core::Move;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type of node in the search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Exact score (PV-node)
    Exact,
    /// Lower bound (fail-high node)
    LowerBound,
    /// Upper bound (fail-low node)
    UpperBound,
}

/// Entry in the transposition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    /// Zobrist hash of the position (for collision detection)
    pub hash: u64,
    /// Best move found at this position
    pub best_move: Option<Move>,
    /// Evaluation score
    pub score: i32,
    /// Search depth
    pub depth: u8,
    /// Type of node (exact, lower bound, upper bound)
    pub node_type: NodeType,
    /// Search generation that wrote the entry, modulo 64
    pub age: u8,
}

/// Transposition table for caching search results.
pub struct TranspositionTable {
    /// Table entries, two words each
    entries: Vec<AtomicU64>,
    /// Size mask (size must be power of 2)
    size_mask: usize,
    /// Current search generation
    generation: u8,
}

impl TranspositionTable {
    /// Creates a new transposition table with the given size in MB.
    pub fn new(size_mb: usize) -> Self {
        // Each entry is 16 bytes (packed into 2 u64s)
        let entries_per_mb = (1024 * 1024) / 16;
        let num_entries = size_mb.max(1) * entries_per_mb;

        // Round down to nearest power of 2
        let size = num_entries.next_power_of_two() / 2;
        let size_mask = size - 1;

        let entries = (0..size * 2).map(|_| AtomicU64::new(0)).collect();

        Self {
            entries,
            size_mask,
            generation: 0,
        }
    }

    /// Number of entry slots.
    pub fn capacity(&self) -> usize {
        self.size_mask + 1
    }

    /// Stores an entry in the transposition table.
    pub fn store(
        &self,
        hash: u64,
        best_move: Option<Move>,
        score: i32,
        depth: u8,
        node_type: NodeType,
    ) {
        let index = (hash as usize & self.size_mask) * 2;

        let entry = TranspositionEntry {
            hash,
            best_move,
            score,
            depth,
            node_type,
            age: self.generation,
        };

        let (packed1, packed2) = Self::pack_entry(&entry);

        self.entries[index].store(packed1, Ordering::Relaxed);
        self.entries[index + 1].store(packed2, Ordering::Relaxed);
    }

    /// Probes the transposition table for a position.
    pub fn probe(&self, hash: u64) -> Option<TranspositionEntry> {
        let index = (hash as usize & self.size_mask) * 2;

        let packed1 = self.entries[index].load(Ordering::Relaxed);
        let packed2 = self.entries[index + 1].load(Ordering::Relaxed);

        // An all-zero slot was never written.
        if packed1 == 0 && packed2 == 0 {
            return None;
        }

        let entry = Self::unpack_entry(packed1, packed2);

        // Verify hash matches (collision detection)
        if entry.hash == hash {
            Some(entry)
        } else {
            None
        }
    }

    /// Clears the transposition table.
    pub fn clear(&mut self) {
        for entry in &self.entries {
            entry.store(0, Ordering::Relaxed);
        }
        self.generation = 0;
    }

    /// Advances to the next search generation.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1) & 0x3F;
    }

    /// Packs an entry into two u64 values.
    fn pack_entry(entry: &TranspositionEntry) -> (u64, u64) {
        // First u64: full hash
        let packed1 = entry.hash;

        // Second u64: move (32 bits) + score (16 bits) + depth (8 bits) +
        //              node_type (2 bits) + age (6 bits)
        let mut packed2 = 0u64;

        // Coordinates are 1-indexed, so a zero move field means "no move"
        if let Some(mv) = entry.best_move {
            let [x1, y1, x2, y2] = mv.to_array();
            packed2 |= u64::from(u32::from_be_bytes([x1, y1, x2, y2]));
        }

        // Pack score (16 bits, offset by 32768 to handle negative values)
        let score = entry.score.clamp(-32768, 32767);
        packed2 |= (((score + 32768) as u64) & 0xFFFF) << 32;

        packed2 |= u64::from(entry.depth) << 48;

        let node_type_bits: u64 = match entry.node_type {
            NodeType::Exact => 0,
            NodeType::LowerBound => 1,
            NodeType::UpperBound => 2,
        };
        packed2 |= node_type_bits << 56;

        packed2 |= u64::from(entry.age & 0x3F) << 58;

        (packed1, packed2)
    }

    /// Unpacks two u64 values into an entry.
    fn unpack_entry(packed1: u64, packed2: u64) -> TranspositionEntry {
        let hash = packed1;

        let move_bits = (packed2 & 0xFFFF_FFFF) as u32;
        let best_move = (move_bits != 0).then(|| Move::from(move_bits.to_be_bytes()));

        let score = ((packed2 >> 32) & 0xFFFF) as i32 - 32768;

        let depth = ((packed2 >> 48) & 0xFF) as u8;

        let node_type = match (packed2 >> 56) & 0x3 {
            1 => NodeType::LowerBound,
            2 => NodeType::UpperBound,
            _ => NodeType::Exact,
        };

        let age = ((packed2 >> 58) & 0x3F) as u8;

        TranspositionEntry {
            hash,
            best_move,
            score,
            depth,
            node_type,
            age,
        }
    }
}

impl fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.capacity())
            .field("generation", &self.generation)
            .finish()
    }
}
