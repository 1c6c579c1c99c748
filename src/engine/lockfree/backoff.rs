//! ### English
//! Spin-then-yield backoff used while another thread finishes a short critical transition
//! (such as the one-time browser engine initialization).
//!
//! ### 中文
//! “短自旋 + 让出调度”退避：用于等待其它线程完成短暂的关键状态迁移
//! （例如一次性的浏览器引擎初始化）。

use std::thread;
use std::time::Duration;

/// ### English
/// Spin budget before switching to `yield_now()`.
///
/// ### 中文
/// 在切换到 `yield_now()` 之前允许的自旋次数预算。
const SPIN_LIMIT: u32 = 64;

/// ### English
/// Yield budget before switching to short sleeps (initialization may take milliseconds).
///
/// ### 中文
/// 在切换到短暂 sleep 之前允许的 `yield` 次数（初始化可能耗时数毫秒）。
const YIELD_LIMIT: u32 = SPIN_LIMIT + 256;

pub(crate) struct Backoff {
    step: u32,
}

impl Backoff {
    #[inline]
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    /// ### English
    /// Performs one backoff step: spin, then yield, then sleep for a millisecond.
    ///
    /// ### 中文
    /// 执行一次退避：先自旋，再让出调度，最后每次 sleep 1 毫秒。
    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.step < SPIN_LIMIT {
            std::hint::spin_loop();
        } else if self.step < YIELD_LIMIT {
            thread::yield_now();
        } else {
            thread::sleep(Duration::from_millis(1));
        }
        self.step = self.step.saturating_add(1);
    }
}
