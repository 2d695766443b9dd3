//! Singly linked list in relocatable storage

use crate::errors::MemoryError;
use crate::memory::AddressingModel;
use crate::pointer::FancyPtr;
use crate::strategy::{AllocationStrategy, LeakyStrategy};
use std::fmt;
use std::marker::PhantomData;

struct Node<T, A: AddressingModel> {
    value: T,
    next: FancyPtr<Node<T, A>, A>,
}

/// A forward list whose links are fancy pointers
pub struct RelocatableList<T, S: AllocationStrategy = LeakyStrategy> {
    head: FancyPtr<Node<T, S::Address>, S::Address>,
    len: usize,
    strategy: S,
}

impl<T, S: AllocationStrategy> RelocatableList<T, S> {
    pub fn new() -> Self {
        Self::with_strategy(S::default())
    }

    pub fn with_strategy(strategy: S) -> Self {
        RelocatableList {
            head: FancyPtr::null(),
            len: 0,
            strategy,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }

    pub fn push_front(&mut self, value: T) -> Result<(), MemoryError> {
        let node = self.strategy.emplace(Node {
            value,
            next: self.head,
        })?;
        self.head = node;
        self.len += 1;
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.head.is_null() {
            return None;
        }
        let node_ptr = self.head;
        // SAFETY: non-null links always address a node written by `push_front`
        let node = unsafe { node_ptr.read() };
        self.head = node.next;
        self.len -= 1;
        self.strategy.deallocate(node_ptr.cast_void());
        Some(node.value)
    }

    pub fn front(&self) -> Option<&T> {
        if self.head.is_null() {
            return None;
        }
        // SAFETY: see `pop_front`; the borrow is tied to `&self`
        Some(unsafe { &self.head.as_ref().value })
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.head.is_null() {
            return None;
        }
        // SAFETY: see `pop_front`; `&mut self` gives exclusive access
        Some(unsafe { &mut self.head.as_mut().value })
    }

    pub fn iter(&self) -> Iter<'_, T, S::Address> {
        Iter {
            next: self.head,
            remaining: self.len,
            _list: PhantomData,
        }
    }

    /// Reverse the list in place by relinking nodes
    pub fn reverse(&mut self) {
        let mut prev = FancyPtr::null();
        let mut current = self.head;
        while !current.is_null() {
            // SAFETY: `current` addresses a live node and nothing else borrows it
            let node = unsafe { current.as_mut() };
            let next = node.next;
            node.next = prev;
            prev = current;
            current = next;
        }
        self.head = prev;
    }

    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }
}

impl<T, S: AllocationStrategy> Default for RelocatableList<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: AllocationStrategy> Drop for RelocatableList<T, S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, S: AllocationStrategy> fmt::Debug for RelocatableList<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`RelocatableList`]
pub struct Iter<'a, T, A: AddressingModel> {
    next: FancyPtr<Node<T, A>, A>,
    remaining: usize,
    _list: PhantomData<&'a T>,
}

impl<'a, T, A: AddressingModel> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.next.is_null() {
            return None;
        }
        // SAFETY: links address live nodes for as long as the list is borrowed
        let node: &'a Node<T, A> = unsafe { self.next.as_ref() };
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, S: AllocationStrategy> IntoIterator for &'a RelocatableList<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S::Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
