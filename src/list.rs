use std::fmt::Debug;

/// Slot arena with a free list of vacant indices.
///
/// Used both as a plain stack (`push`/`pop`) for traversal work lists and
/// as slot storage (`insert`/`erase`) for nodes and geometry.
#[derive(Clone, Debug)]
pub struct List<T>
    where T: Clone + Debug
{
    data: Vec<T>,
    vacant: Vec<usize>,
}

impl<T> Default for List<T>
    where
        T: Clone + Debug + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T>
    where
        T: Clone + Debug + Default,
{
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Number of slots handed out, vacant ones included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> &T {
        debug_assert!(index < self.data.len());
        &self.data[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.data.len());
        &mut self.data[index]
    }

    pub fn set(&mut self, index: usize, element: T) {
        debug_assert!(index < self.data.len());
        self.data[index] = element;
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.vacant.clear();
    }

    pub fn push(&mut self, element: T) -> usize {
        self.data.push(element);
        self.data.len() - 1
    }

    /// Removes the last slot. A vacancy recorded for it is forgotten.
    pub fn pop(&mut self) -> Option<T> {
        let element = self.data.pop()?;
        let len = self.data.len();
        self.vacant.retain(|&index| index < len);
        Some(element)
    }

    /// Stores `element`, reusing the most recently erased slot if any.
    pub fn insert(&mut self, element: T) -> usize {
        match self.vacant.pop() {
            Some(index) => {
                self.data[index] = element;
                index
            }
            None => self.push(element),
        }
    }

    /// Marks a slot vacant. Erasing a slot twice before it is reused is
    /// a caller bug.
    pub fn erase(&mut self, index: usize) {
        debug_assert!(index < self.data.len());
        debug_assert!(!self.vacant.contains(&index));
        self.data[index] = T::default();
        self.vacant.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_order() {
        let mut list = List::new();
        list.push(1);
        list.push(2);
        list.push(3);
        assert_eq!(list.pop(), Some(3));
        assert_eq!(list.pop(), Some(2));
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop(), Some(1));
        assert_eq!(list.pop(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn erased_slots_are_reused() {
        let mut list = List::new();
        let a = list.insert(10);
        let b = list.insert(20);
        list.insert(30);
        list.erase(b);
        list.erase(a);

        assert_eq!(list.insert(40), a);
        assert_eq!(list.insert(50), b);
        assert_eq!(list.insert(60), 3);
        assert_eq!(*list.get(a), 40);
        assert_eq!(*list.get(b), 50);
    }

    #[test]
    fn clear_forgets_vacancies() {
        let mut list = List::new();
        let a = list.insert(1);
        list.erase(a);
        list.clear();
        assert_eq!(list.insert(7), 0);
        list.set(0, 8);
        *list.get_mut(0) += 1;
        assert_eq!(*list.get(0), 9);
    }

    #[test]
    fn pop_drops_vacancy_of_the_popped_slot() {
        let mut list = List::new();
        list.insert('a');
        list.insert('b');
        list.erase(1);
        list.pop();
        assert_eq!(list.len(), 1);
        assert_eq!(list.insert('c'), 1);
        assert_eq!(*list.get(1), 'c');
        assert_eq!(*list.get(0), 'a');
    }
}
