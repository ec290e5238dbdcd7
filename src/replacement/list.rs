use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

/// Position of a node inside the node arena.
type Slot = usize;

#[derive(Clone)]
struct Node<P> {
    page: P,
    prev: Option<Slot>,
    next: Option<Slot>,
}

/// LinkedSet is an ordered set of pages backed by a hash index and an
/// arena-allocated doubly-linked list.
///
/// The front of the list holds the oldest entry and the back the newest one.
/// Membership test, append, move-to-back, pop-front and removal of an
/// arbitrary entry are all O(1): the index maps a page to its arena slot,
/// and every node knows both of its neighbours.
///
/// Removed nodes are swapped out of the arena with the last node, so the
/// arena never holds holes and its length always equals the set length.
#[derive(Clone)]
pub struct LinkedSet<P> {
    index: HashMap<P, Slot>,
    nodes: Vec<Node<P>>,
    head: Option<Slot>,
    tail: Option<Slot>,
}

impl<P> LinkedSet<P>
where
    P: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LinkedSet {
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, page: &P) -> bool {
        self.index.contains_key(page)
    }

    /// The oldest entry, i.e., the next one `pop_front` would return.
    pub fn front(&self) -> Option<&P> {
        self.head.map(|slot| &self.nodes[slot].page)
    }

    /// The newest entry.
    pub fn back(&self) -> Option<&P> {
        self.tail.map(|slot| &self.nodes[slot].page)
    }

    /// Append the page at the back. Return false and leave the set untouched
    /// if the page is already a member.
    pub fn push_back(&mut self, page: P) -> bool {
        if self.index.contains_key(&page) {
            return false;
        }
        let slot = self.nodes.len();
        self.nodes.push(Node { page: page.clone(), prev: None, next: None });
        self.index.insert(page, slot);
        self.link_back(slot);
        true
    }

    /// Move an existing member to the back. Return false if the page is not
    /// a member.
    pub fn move_to_back(&mut self, page: &P) -> bool {
        let Some(&slot) = self.index.get(page) else {
            return false;
        };
        if self.tail != Some(slot) {
            self.unlink(slot);
            self.link_back(slot);
        }
        true
    }

    pub fn pop_front(&mut self) -> Option<P> {
        let slot = self.head?;
        Some(self.remove_slot(slot))
    }

    pub fn remove(&mut self, page: &P) -> Option<P> {
        let slot = *self.index.get(page)?;
        Some(self.remove_slot(slot))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterate from the front (oldest) to the back (newest).
    pub fn iter(&self) -> Iter<'_, P> {
        Iter { set: self, cursor: self.head }
    }

    fn link_back(&mut self, slot: Slot) {
        self.nodes[slot].prev = self.tail;
        self.nodes[slot].next = None;
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    fn unlink(&mut self, slot: Slot) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[slot].prev = None;
        self.nodes[slot].next = None;
    }

    fn remove_slot(&mut self, slot: Slot) -> P {
        self.unlink(slot);
        let node = self.nodes.swap_remove(slot);
        self.index.remove(&node.page);

        // the former last node now lives at `slot`, re-point its
        // neighbours and its index entry.
        if slot < self.nodes.len() {
            let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
            match prev {
                Some(prev) => self.nodes[prev].next = Some(slot),
                None => self.head = Some(slot),
            }
            match next {
                Some(next) => self.nodes[next].prev = Some(slot),
                None => self.tail = Some(slot),
            }
            if let Some(moved) = self.index.get_mut(&self.nodes[slot].page) {
                *moved = slot;
            }
        }
        node.page
    }
}

impl<P> Default for LinkedSet<P>
where
    P: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Debug> Debug for LinkedSet<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            list.entry(&self.nodes[slot].page);
            cursor = self.nodes[slot].next;
        }
        list.finish()
    }
}

pub struct Iter<'a, P> {
    set: &'a LinkedSet<P>,
    cursor: Option<Slot>,
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = &self.set.nodes[slot];
        self.cursor = node.next;
        Some(&node.page)
    }
}

impl<'a, P> IntoIterator for &'a LinkedSet<P>
where
    P: Eq + Hash + Clone,
{
    type Item = &'a P;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(set: &LinkedSet<i32>) -> Vec<i32> {
        set.iter().copied().collect()
    }

    #[test]
    fn test_push_and_pop_order() {
        let mut set = LinkedSet::new();
        assert!(set.is_empty());
        assert_eq!(None, set.pop_front());

        assert!(set.push_back(1));
        assert!(set.push_back(2));
        assert!(set.push_back(3));
        // duplicates are rejected
        assert!(!set.push_back(2));
        assert_eq!(3, set.len());
        assert_eq!(vec![1, 2, 3], items(&set));
        assert_eq!(Some(&1), set.front());
        assert_eq!(Some(&3), set.back());

        assert_eq!(Some(1), set.pop_front());
        assert_eq!(Some(2), set.pop_front());
        assert_eq!(Some(3), set.pop_front());
        assert_eq!(None, set.pop_front());
        assert!(set.is_empty());
        assert_eq!(None, set.front());
        assert_eq!(None, set.back());
    }

    #[test]
    fn test_move_to_back() {
        let mut set = LinkedSet::new();
        for i in 1..=4 {
            set.push_back(i);
        }

        assert!(set.move_to_back(&1));
        assert_eq!(vec![2, 3, 4, 1], items(&set));
        assert!(set.move_to_back(&3));
        assert_eq!(vec![2, 4, 1, 3], items(&set));
        // moving the tail is a no-op
        assert!(set.move_to_back(&3));
        assert_eq!(vec![2, 4, 1, 3], items(&set));
        assert!(!set.move_to_back(&9));

        assert_eq!(Some(&2), set.front());
        assert_eq!(Some(&3), set.back());
    }

    #[test]
    fn test_remove_repoints_moved_slot() {
        let mut set = LinkedSet::new();
        for i in 1..=5 {
            set.push_back(i);
        }
        set.move_to_back(&2);
        // [1, 3, 4, 5, 2], removing 1 swaps the last arena node into slot 0.
        assert_eq!(Some(1), set.remove(&1));
        assert_eq!(vec![3, 4, 5, 2], items(&set));
        assert!(!set.contains(&1));

        assert_eq!(Some(5), set.remove(&5));
        assert_eq!(vec![3, 4, 2], items(&set));
        assert_eq!(None, set.remove(&5));

        // every remaining member is still reachable through the index.
        for i in [3, 4, 2] {
            assert!(set.move_to_back(&i));
        }
        assert_eq!(vec![3, 4, 2], items(&set));

        set.push_back(7);
        assert_eq!(Some(3), set.pop_front());
        assert_eq!(vec![4, 2, 7], items(&set));
        assert_eq!(format!("{:?}", set), "[4, 2, 7]");
    }

    #[test]
    fn test_clear() {
        let mut set = LinkedSet::with_capacity(2);
        set.push_back("a");
        set.push_back("b");
        set.clear();
        assert!(set.is_empty());
        assert_eq!(None, set.front());
        assert!(set.push_back("b"));
        assert_eq!(vec!["b"], set.iter().copied().collect::<Vec<_>>());
    }
}
