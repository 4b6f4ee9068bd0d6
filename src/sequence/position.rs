/// Reference to one arena slot, qualified by the slot's generation.
///
/// The generation is bumped every time a slot is vacated, so a reference to
/// an erased node never matches a node later allocated in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct NodeRef {
    pub(super) slot: usize,
    pub(super) generation: u32,
}

/// A stable, container-bound location within a [`LinkedSequence`].
///
/// A position is a plain `Copy` value: it does not borrow the sequence, so a
/// caller can hold one across any number of edits. Every operation that
/// consumes a position goes through the owning sequence, which validates it.
///
/// Equality follows the container identity first and the node second:
///
/// - two default positions compare equal;
/// - a default position never equals a position obtained from a sequence,
///   not even the past-the-end one;
/// - positions from the same sequence are equal iff they denote the same
///   element (or are both past-the-end).
///
/// Comparing positions taken from two different sequences is unsupported.
/// The result is well defined (they compare unequal) but callers must not
/// rely on it.
///
/// A position remains valid until the element it denotes is erased, or until
/// the sequence is cleared. Positions to other elements are unaffected by
/// insertions and removals elsewhere.
///
/// [`LinkedSequence`]: super::LinkedSequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub(super) owner: Option<u64>,
    pub(super) node: Option<NodeRef>,
}

impl Position {
    pub(super) const fn new(owner: u64, node: Option<NodeRef>) -> Self {
        Self {
            owner: Some(owner),
            node,
        }
    }

    /// Whether this position was obtained from a sequence.
    pub const fn is_bound(&self) -> bool {
        self.owner.is_some()
    }
}
