//! ### English
//! Lock-free primitives shared across the engine.
//!
//! The paint boundary is the only structure touched by more than one thread; everything here
//! exists to keep that hand-off wait-free for producers.
//!
//! ### 中文
//! 引擎内复用的无锁原语。
//!
//! paint 边界是唯一被多线程访问的结构；这里的工具用于保证生产者侧的交接无需等待。
mod backoff;
mod mpsc;

pub(crate) use backoff::Backoff;
pub(crate) use mpsc::MpscQueue;
