use crate::Future;

/// Stack elements know what an empty pop produces.
pub trait Underflow {
    fn underflow() -> Self;
}

impl Underflow for i64 {
    fn underflow() -> Self {
        0
    }
}

impl Underflow for Future {
    fn underflow() -> Self {
        Future::ready(0)
    }
}

/// LIFO stack where popping past the bottom yields zero instead of failing.
#[derive(Debug)]
pub struct Stack<T> {
    items: Vec<T>,
}

pub type ValueStack = Stack<i64>;
pub type FutureStack = Stack<Future>;

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Underflow> Stack<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> T {
        self.items.pop().unwrap_or_else(T::underflow)
    }

    /// Pops `N` values, first popped first.
    pub fn pop_n<const N: usize>(&mut self) -> [T; N] {
        std::array::from_fn(|_| self.pop())
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.items.len()
    }

    /// Bottom to top.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
