//! Doubly linked, double-ended sequence with stable positions.
//!
//! [`LinkedSequence`] stores its nodes in an arena owned by the sequence.
//! Nodes link to their neighbours by slot index, so the links are plain
//! navigation data and every node has exactly one owner. Insertion and
//! removal at a known [`Position`] are O(1), as are pushes and pops at
//! either end.
//!
//! Positions survive edits that do not touch the element they denote.
//! Misusing a position (dereferencing past-the-end, stepping off either
//! end, handing a position to the wrong sequence, or reusing one whose
//! element was erased) is a programming error and panics.

mod iter;
mod position;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use iter::Iter;
pub use position::Position;

use position::NodeRef;

static NEXT_SEQUENCE_ID: AtomicU64 = AtomicU64::new(1);

const ERASED_ELEMENT: &str = "position refers to an element that has been erased";

struct Node<T> {
    value: T,
    prev: Option<NodeRef>,
    next: Option<NodeRef>,
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// A doubly linked, double-ended ordered container.
///
/// # Example
///
/// ```
/// use linebuf::LinkedSequence;
///
/// let mut seq: LinkedSequence<char> = "ac".chars().collect();
/// let c = seq.next(seq.begin());
/// let b = seq.insert(c, 'b');
/// assert_eq!(seq.get(b), &'b');
/// assert_eq!(seq.get(c), &'c');
/// assert_eq!(seq.iter().collect::<String>(), "abc");
/// ```
pub struct LinkedSequence<T> {
    id: u64,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    first: Option<NodeRef>,
    last: Option<NodeRef>,
    len: usize,
}

impl<T> LinkedSequence<T> {
    /// Create an empty sequence with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: NEXT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            first: None,
            last: None,
            len: 0,
        }
    }

    /// Number of elements.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first element.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn front(&self) -> &T {
        let first = self.expect_first("front");
        &self.node(first).value
    }

    /// The first element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        let first = self.expect_first("front_mut");
        &mut self.node_mut(first).value
    }

    /// The last element.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn back(&self) -> &T {
        let last = self.expect_last("back");
        &self.node(last).value
    }

    /// The last element, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        let last = self.expect_last("back_mut");
        &mut self.node_mut(last).value
    }

    pub fn push_front(&mut self, value: T) {
        let old_first = self.first;
        let node = self.alloc(value, None, old_first);
        match old_first {
            Some(old) => self.node_mut(old).prev = Some(node),
            None => self.last = Some(node),
        }
        self.first = Some(node);
        self.len += 1;
    }

    pub fn push_back(&mut self, value: T) {
        let old_last = self.last;
        let node = self.alloc(value, old_last, None);
        match old_last {
            Some(old) => self.node_mut(old).next = Some(node),
            None => self.first = Some(node),
        }
        self.last = Some(node);
        self.len += 1;
    }

    /// Remove and return the first element.
    ///
    /// Only positions to the removed element are invalidated.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn pop_front(&mut self) -> T {
        let first = self.expect_first("pop_front");
        let node = self.release(first);
        self.first = node.next;
        match node.next {
            Some(next) => self.node_mut(next).prev = None,
            None => self.last = None,
        }
        self.len -= 1;
        node.value
    }

    /// Remove and return the last element.
    ///
    /// Only positions to the removed element are invalidated.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty.
    #[track_caller]
    pub fn pop_back(&mut self) -> T {
        let last = self.expect_last("pop_back");
        let node = self.release(last);
        self.last = node.prev;
        match node.prev {
            Some(prev) => self.node_mut(prev).next = None,
            None => self.first = None,
        }
        self.len -= 1;
        node.value
    }

    /// Remove every element. Invalidates all positions.
    pub fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.node.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(slot);
            }
        }
        self.first = None;
        self.last = None;
        self.len = 0;
    }

    /// Position of the first element, or past-the-end when empty.
    pub const fn begin(&self) -> Position {
        Position::new(self.id, self.first)
    }

    /// The past-the-end position.
    pub const fn end(&self) -> Position {
        Position::new(self.id, None)
    }

    /// Whether `pos` belongs to this sequence and still denotes a live
    /// element (or past-the-end). Never panics.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.owner == Some(self.id) && pos.node.is_none_or(|node| self.is_live(node))
    }

    /// The element at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is past-the-end, belongs to another sequence, or its
    /// element has been erased.
    #[track_caller]
    pub fn get(&self, pos: Position) -> &T {
        let node = self.expect_element(pos, "get");
        &self.node(node).value
    }

    /// The element at `pos`, mutably.
    ///
    /// # Panics
    ///
    /// Same conditions as [`get`](Self::get).
    #[track_caller]
    pub fn get_mut(&mut self, pos: Position) -> &mut T {
        let node = self.expect_element(pos, "get_mut");
        &mut self.node_mut(node).value
    }

    /// Step one element forward.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is already past-the-end.
    #[track_caller]
    pub fn next(&self, pos: Position) -> Position {
        self.check_owner(pos, "next");
        let Some(node) = pos.node else {
            panic!("cannot step forward from the past-the-end position");
        };
        Position::new(self.id, self.node(node).next)
    }

    /// Step one element backward. Stepping back from past-the-end lands on
    /// the last element.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is the first position (including past-the-end of an
    /// empty sequence).
    #[track_caller]
    pub fn prev(&self, pos: Position) -> Position {
        self.check_owner(pos, "prev");
        assert!(
            pos != self.begin(),
            "cannot step backward from the first position"
        );
        let node = match pos.node {
            Some(node) => self.node(node).prev,
            None => self.last,
        };
        Position::new(self.id, node)
    }

    /// Walk `index` steps forward from the start. O(n).
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn position_at(&self, index: usize) -> Position {
        assert!(
            index <= self.len,
            "index {index} is beyond the end of a sequence of length {}",
            self.len
        );
        let mut pos = self.begin();
        for _ in 0..index {
            pos = self.next(pos);
        }
        pos
    }

    /// Insert `value` immediately before `pos` (at the back when `pos` is
    /// past-the-end) and return the new element's position.
    ///
    /// `pos` itself stays valid and still denotes the same element.
    ///
    /// # Panics
    ///
    /// Panics if `pos` belongs to another sequence or its element has been
    /// erased.
    #[track_caller]
    pub fn insert(&mut self, pos: Position, value: T) -> Position {
        self.check_owner(pos, "insert");
        if pos.node == self.first {
            self.push_front(value);
            return self.begin();
        }
        let Some(at) = pos.node else {
            self.push_back(value);
            return Position::new(self.id, self.last);
        };
        let Some(before) = self.node(at).prev else {
            unreachable!("only the first element lacks a predecessor");
        };
        let node = self.alloc(value, Some(before), Some(at));
        self.node_mut(at).prev = Some(node);
        self.node_mut(before).next = Some(node);
        self.len += 1;
        Position::new(self.id, Some(node))
    }

    /// Erase the element at `pos`, returning the position of the element
    /// that followed it (past-the-end if none).
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not dereferenceable.
    #[track_caller]
    pub fn erase(&mut self, pos: Position) -> Position {
        self.remove(pos).1
    }

    /// Like [`erase`](Self::erase), but hands back the removed value.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not dereferenceable.
    #[track_caller]
    pub fn remove(&mut self, pos: Position) -> (T, Position) {
        let at = self.expect_element(pos, "erase");
        let (prev, next) = {
            let node = self.node(at);
            (node.prev, node.next)
        };
        match (prev, next) {
            (None, None) => (self.pop_back(), self.end()),
            (None, Some(next)) => (self.pop_front(), Position::new(self.id, Some(next))),
            (Some(_), None) => (self.pop_back(), self.end()),
            (Some(prev), Some(next)) => {
                let node = self.release(at);
                self.node_mut(prev).next = Some(next);
                self.node_mut(next).prev = Some(prev);
                self.len -= 1;
                (node.value, Position::new(self.id, Some(next)))
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    // --- Private helpers ---

    fn alloc(&mut self, value: T, prev: Option<NodeRef>, next: Option<NodeRef>) -> NodeRef {
        let node = Node { value, prev, next };
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot];
            entry.node = Some(node);
            NodeRef {
                slot,
                generation: entry.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeRef {
                slot: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    #[track_caller]
    fn release(&mut self, node: NodeRef) -> Node<T> {
        let Some(entry) = self
            .slots
            .get_mut(node.slot)
            .filter(|entry| entry.generation == node.generation)
        else {
            panic!("{ERASED_ELEMENT}");
        };
        let Some(released) = entry.node.take() else {
            panic!("{ERASED_ELEMENT}");
        };
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(node.slot);
        released
    }

    fn is_live(&self, node: NodeRef) -> bool {
        matches!(
            self.slots.get(node.slot),
            Some(Slot { generation, node: Some(_) }) if *generation == node.generation
        )
    }

    #[track_caller]
    fn node(&self, node: NodeRef) -> &Node<T> {
        match self.slots.get(node.slot) {
            Some(Slot {
                generation,
                node: Some(found),
            }) if *generation == node.generation => found,
            _ => panic!("{ERASED_ELEMENT}"),
        }
    }

    #[track_caller]
    fn node_mut(&mut self, node: NodeRef) -> &mut Node<T> {
        match self.slots.get_mut(node.slot) {
            Some(Slot {
                generation,
                node: Some(found),
            }) if *generation == node.generation => found,
            _ => panic!("{ERASED_ELEMENT}"),
        }
    }

    #[track_caller]
    fn check_owner(&self, pos: Position, op: &str) {
        assert!(
            pos.owner == Some(self.id),
            "{op}: position does not belong to this sequence"
        );
    }

    #[track_caller]
    fn expect_element(&self, pos: Position, op: &str) -> NodeRef {
        self.check_owner(pos, op);
        match pos.node {
            Some(node) => node,
            None => panic!("{op}: cannot use the past-the-end position"),
        }
    }

    #[track_caller]
    fn expect_first(&self, op: &str) -> NodeRef {
        match self.first {
            Some(first) => first,
            None => panic!("{op}() called on an empty sequence"),
        }
    }

    #[track_caller]
    fn expect_last(&self, op: &str) -> NodeRef {
        match self.last {
            Some(last) => last,
            None => panic!("{op}() called on an empty sequence"),
        }
    }
}

impl<T> Default for LinkedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep, order-preserving copy. The copy gets its own identity, so
/// positions from the source are not accepted by it.
impl<T: Clone> Clone for LinkedSequence<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T> FromIterator<T> for LinkedSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Self::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> Extend<T> for LinkedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T: PartialEq> PartialEq for LinkedSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedSequence<T> {}

impl<T: fmt::Debug> fmt::Debug for LinkedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
