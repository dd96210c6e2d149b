//! Lock-free single-producer single-consumer queues.
//!
//! | Type | Elements | Read side |
//! |------|----------|-----------|
//! | [`RingQueue`] | any `T` | one element at a time (`peek` / `pop`) |
//! | [`ContiguousRingBuffer`] | `T: Copy` | linear ranges for DMA (`peek_range` / `drop_range`) |
//!
//! Both hold exactly `N` elements (`N` a power of two, checked at compile
//! time) and never block. One context produces, one consumes; the two
//! synchronize through an occupancy counter with release/acquire ordering.

pub mod contiguous;
pub mod ring;

pub use contiguous::ContiguousRingBuffer;
pub use ring::RingQueue;

#[cfg(test)]
mod stress_tests;
