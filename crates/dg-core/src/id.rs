use lasso::{Key, Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Interner shared by every registry in the process.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for shapes in the registry.
/// Names look like `segment1`; equality and hashing compare the interned key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Spur);

impl ShapeId {
    /// Intern a new string as a ShapeId, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        ShapeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

// Link graphs need `Ord` node weights; interning order is stable per process.
impl PartialOrd for ShapeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShapeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.into_usize().cmp(&other.0.into_usize())
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ShapeId::intern(&s))
    }
}

/// Index of a point in the registry's point arena.
///
/// Two shapes that share a vertex hold the same `PointId`; that identity is
/// what welding establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Per-registry ID allocator. Produces `segment1`, `segment2`, `circle1`, …
/// with one monotonic counter per prefix.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counters: HashMap<&'static str, u32>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID for a kind prefix.
    pub fn next(&mut self, prefix: &'static str) -> ShapeId {
        let n = self.counters.entry(prefix).or_insert(0);
        *n += 1;
        ShapeId::intern(&format!("{prefix}{n}"))
    }
}

const DESIGNATIONS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Hands out point designations: `A`..`Z`, then `A1`..`Z1`, `A2`, …
#[derive(Debug, Clone, Default)]
pub struct LetterAllocator {
    next: usize,
    mark: u32,
}

impl LetterAllocator {
    pub fn next_letter(&mut self) -> String {
        if self.next >= DESIGNATIONS.len() {
            self.next = 0;
            self.mark += 1;
        }
        let letter = DESIGNATIONS[self.next];
        self.next += 1;
        if self.mark == 0 {
            letter.to_string()
        } else {
            format!("{letter}{}", self.mark)
        }
    }
}
