//! A stack for detecting circular dependencies during depth-first traversal.

/// A generic stack implementation with circular dependency detection.
#[derive(Debug, Clone)]
pub struct Stack<T: PartialEq + Clone> {
    items: Vec<T>,
}

impl<T: PartialEq + Clone> Stack<T> {
    /// Creates a new empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: vec![] }
    }

    /// Pushes an item onto the top of the stack.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top item from the stack.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Finds a circular dependency starting from the given item.
    ///
    /// If the item is already on the stack, returns every item from its
    /// first occurrence to the top of the stack, followed by the item itself.
    #[must_use]
    pub fn find_circular_dependency(&self, item: &T) -> Option<Vec<T>> {
        let item_index = self.items.iter().position(|i| i == item)?;

        let mut circular_dependency = self.items[item_index..].to_vec();
        circular_dependency.push(item.clone());

        Some(circular_dependency)
    }
}

impl<T: PartialEq + Clone> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_finds_circular_dependency() {
        let mut stack = Stack::new();
        stack.push("a");
        stack.push("b");
        stack.push("c");

        assert_eq!(stack.find_circular_dependency(&"b"), Some(vec!["b", "c", "b"]));
        assert_eq!(stack.find_circular_dependency(&"d"), None);

        assert_eq!(stack.pop(), Some("c"));
        assert_eq!(stack.find_circular_dependency(&"c"), None);
    }
}
