//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - TTL Sweep: removes expired cache entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
