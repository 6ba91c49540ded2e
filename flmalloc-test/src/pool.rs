//! A batch of worker threads, joined no later than drop.

use std::thread;

/// Pool.
///
/// Spawns one thread per index and guarantees they are all joined before the pool goes away, so a failed
/// assertion in one test cannot leak running threads into the next.
pub struct Pool<T> {
    handles: Vec<thread::JoinHandle<T>>,
}

impl<T: Send + 'static> Pool<T> {
    /// Spawns `count` threads, each running the closure `factory` produces for its index.
    pub fn spawn<F, G>(count: usize, mut factory: F) -> Self
        where
            F: FnMut(usize) -> G,
            G: FnOnce() -> T + Send + 'static,
    {
        Self { handles: (0..count).map(|index| thread::spawn(factory(index))).collect() }
    }

    /// Joins all threads, returning their results in spawn order.
    ///
    /// #   Panics
    ///
    /// If a thread panicked; the remaining threads are still joined, on drop.
    pub fn join(mut self) -> Vec<T> {
        self.handles.drain(..).map(|handle| handle.join().expect("thread completed")).collect()
    }
}

impl<T> Drop for Pool<T> {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            //  A panic is already propagating when this path joins anything; swallowing the secondary result
            //  avoids a double panic.
            let _ = handle.join();
        }
    }
}
