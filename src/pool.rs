//! Lock-free pool of reusable byte buffers for rendering events.
//!
//! Buffers are plain `Vec<u8>`s because every encoder writes into one. The
//! pool is bounded: when it is full, or a buffer grew past the size limit,
//! the returned buffer is dropped instead.

use crossbeam::queue::ArrayQueue;
use std::ops::{Deref, DerefMut};

/// Buffers that grew past this are dropped instead of being pooled.
pub const DEFAULT_MAX_BUFFER_CAPACITY: usize = 64 * 1024;

/// Upper bound on idle buffers kept by a pool.
pub const DEFAULT_MAX_POOLED: usize = 64;

/// Concurrent pool of reusable byte buffers.
///
/// A buffer handed out by [`BufferPool::get`] is cleared and exclusively
/// owned by the caller until its [`PooledBuffer`] guard is dropped, at which
/// point it goes back to the pool.
#[derive(Debug)]
pub struct BufferPool {
    queue: ArrayQueue<Vec<u8>>,
    max_capacity: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        BufferPool::with_limits(DEFAULT_MAX_POOLED, DEFAULT_MAX_BUFFER_CAPACITY)
    }

    /// A pool keeping at most `max_pooled` idle buffers (at least one) of at
    /// most `max_capacity` bytes each.
    pub fn with_limits(max_pooled: usize, max_capacity: usize) -> Self {
        BufferPool {
            queue: ArrayQueue::new(max_pooled.max(1)),
            max_capacity,
        }
    }

    /// Take an empty buffer, reusing a pooled one when available.
    pub fn get(&self) -> PooledBuffer<'_> {
        let mut buf = self.queue.pop().unwrap_or_default();
        buf.clear();
        PooledBuffer { buf, pool: self }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.queue.len()
    }

    /// Maximum number of idle buffers.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    fn put(&self, buf: Vec<u8>) {
        if buf.capacity() > self.max_capacity {
            return;
        }
        // A full pool hands the buffer back; it is dropped here.
        let _ = self.queue.push(buf);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        BufferPool::new()
    }
}

/// A buffer borrowed from a [`BufferPool`]; returned to it on drop.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn buffers_are_reused_and_cleared() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.get();
            buf.extend_from_slice(b"hello");
        }
        assert_eq!(pool.idle(), 1);

        let buf = pool.get();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 5);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn oversized_buffers_are_dropped() {
        let pool = BufferPool::with_limits(4, 16);
        {
            let mut buf = pool.get();
            buf.extend_from_slice(&[0u8; 64]);
        }
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn idle_count_is_bounded() {
        let pool = BufferPool::with_limits(2, 1024);
        {
            let _a = pool.get();
            let _b = pool.get();
            let _c = pool.get();
        }
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn zero_limit_still_pools_one_buffer() {
        let pool = BufferPool::with_limits(0, 1024);
        drop(pool.get());
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn concurrent_use_never_shares_a_buffer() {
        let pool = Arc::new(BufferPool::new());
        let handles: Vec<_> = (0..8u8)
            .map(|id| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let mut buf = pool.get();
                        assert!(buf.is_empty());
                        buf.extend(std::iter::repeat(id).take(32));
                        assert!(buf.iter().all(|&b| b == id));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.idle() <= DEFAULT_MAX_POOLED);
    }
}
