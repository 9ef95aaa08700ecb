/// Two buffers with a single swap operation.
///
/// Readers see `current`, writers fill `next`; `swap` promotes `next`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleBuffer<T> {
    buffers: [T; 2],
    front: usize,
}

impl<T> DoubleBuffer<T> {
    /// Creates a buffer pair with `current` in front.
    pub fn new(current: T, next: T) -> Self {
        Self {
            buffers: [current, next],
            front: 0,
        }
    }

    /// The buffer being read this round.
    pub fn current(&self) -> &T {
        &self.buffers[self.front]
    }

    /// Borrows both buffers: `(current, next)`.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.buffers;
        if self.front == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Promotes `next` to `current`.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }
}
