//! Background Tasks Module
//!
//! Opt-in helpers a caller can run alongside a cache. Backends never
//! schedule work on their own.
//!
//! # Tasks
//! - Sweep: Removes expired entries at a fixed interval

mod sweep;

pub use sweep::spawn_sweep_task;
