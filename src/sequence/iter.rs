use std::iter::FusedIterator;

use super::LinkedSequence;
use super::position::NodeRef;

/// Borrowing front-to-back iterator over a [`LinkedSequence`].
///
/// Created by [`LinkedSequence::iter`]. Walks from both ends so it can be
/// reversed; `remaining` keeps the two cursors from crossing.
pub struct Iter<'a, T> {
    sequence: &'a LinkedSequence<T>,
    front: Option<NodeRef>,
    back: Option<NodeRef>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) const fn new(sequence: &'a LinkedSequence<T>) -> Self {
        Self {
            sequence,
            front: sequence.first,
            back: sequence.last,
            remaining: sequence.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.front?);
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.back?);
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            sequence: self.sequence,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> IntoIterator for &'a LinkedSequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
