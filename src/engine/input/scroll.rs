//! ### English
//! Smooth-scroll accumulator.
//!
//! Wheel input is scaled and accumulated; every frame each axis releases at most
//! `max(speed * dt, 1)` pixels, truncated to an integer, keeping the fractional remainder.
//!
//! ### 中文
//! 平滑滚动累加器。
//!
//! 滚轮输入经缩放后累加；每帧每个轴最多释放 `max(speed * dt, 1)` 像素（截断为整数），
//! 并保留小数余量。

/// ### English
/// One per-frame wheel delivery at the anchor position.
///
/// ### 中文
/// 在锚点位置的一次逐帧滚轮投递。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollStep {
    pub x: i32,
    pub y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
}

/// ### English
/// Residual wheel delta not yet delivered, plus the position it is delivered at.
///
/// ### 中文
/// 尚未投递的滚轮余量，以及投递时使用的位置。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollAccumulator {
    pending_x: f32,
    pending_y: f32,
    anchor: (i32, i32),
}

impl ScrollAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// ### English
    /// Adds already-scaled wheel delta and moves the anchor to `anchor`.
    ///
    /// ### 中文
    /// 累加已缩放的滚轮增量，并将锚点移动到 `anchor`。
    pub fn accumulate(&mut self, delta_x: f32, delta_y: f32, anchor: (i32, i32)) {
        if delta_x.is_finite() {
            self.pending_x += delta_x;
        }
        if delta_y.is_finite() {
            self.pending_y += delta_y;
        }
        self.anchor = anchor;
    }

    /// ### English
    /// Releases this frame's share. Returns `None` when both axes deliver zero.
    ///
    /// #### Parameters
    /// - `speed`: Delivery speed in pixels per second.
    /// - `delta_time`: Frame time in seconds.
    ///
    /// ### 中文
    /// 释放本帧份额；两个轴都为零时返回 `None`。
    ///
    /// #### 参数
    /// - `speed`：投递速度（像素/秒）。
    /// - `delta_time`：帧时间（秒）。
    pub fn step(&mut self, speed: f32, delta_time: f32) -> Option<ScrollStep> {
        let budget = speed * delta_time;
        let max_step = if budget.is_finite() { budget.max(1.0) } else { 1.0 };

        let delta_x = step_axis(&mut self.pending_x, max_step);
        let delta_y = step_axis(&mut self.pending_y, max_step);
        if delta_x == 0 && delta_y == 0 {
            return None;
        }
        Some(ScrollStep {
            x: self.anchor.0,
            y: self.anchor.1,
            delta_x,
            delta_y,
        })
    }

    #[inline]
    pub fn pending(&self) -> (f32, f32) {
        (self.pending_x, self.pending_y)
    }

    #[inline]
    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    pub fn clear(&mut self) {
        self.pending_x = 0.0;
        self.pending_y = 0.0;
    }
}

fn step_axis(pending: &mut f32, max_step: f32) -> i32 {
    if *pending == 0.0 {
        return 0;
    }
    let step = (pending.signum() * pending.abs().min(max_step)).trunc();
    *pending -= step;
    step as i32
}
