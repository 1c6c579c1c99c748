//! ### English
//! Per-surface configuration (scrolling behavior, texture format, frame coalescing).
//!
//! ### 中文
//! 每个 surface 的配置（滚动行为、纹理格式、帧合并）。

/// ### English
/// Default wheel delta per notch, in embedded-surface pixels.
///
/// ### 中文
/// 每个滚轮刻度的默认增量（嵌入 surface 像素）。
pub const DEFAULT_SCROLL_SCALE: f32 = 120.0;

/// ### English
/// Default smooth-scroll delivery speed (pixels per second).
///
/// ### 中文
/// 默认平滑滚动投递速度（像素/秒）。
pub const DEFAULT_SCROLL_SPEED: f32 = 4800.0;

/// ### English
/// Default paint-queue depth after which a warning is logged.
///
/// ### 中文
/// paint 队列深度超过该值时记录警告。
pub const DEFAULT_QUEUE_WARN_DEPTH: usize = 32;

/// ### English
/// Per-axis multiplier applied to raw wheel notches.
///
/// ### 中文
/// 作用于原始滚轮刻度的每轴倍率。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollScale {
    pub x: f32,
    pub y: f32,
}

impl Default for ScrollScale {
    fn default() -> Self {
        Self {
            x: DEFAULT_SCROLL_SCALE,
            y: DEFAULT_SCROLL_SCALE,
        }
    }
}

/// ### English
/// Options recognized by one embedded surface instance.
///
/// ### 中文
/// 单个嵌入 surface 实例识别的选项。
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    /// ### English
    /// Accumulate wheel input and deliver it over several frames.
    ///
    /// ### 中文
    /// 累积滚轮输入，并在多帧内逐步投递。
    pub smooth_scroll: bool,
    /// ### English
    /// Wheel notch multiplier per axis.
    ///
    /// ### 中文
    /// 每轴的滚轮刻度倍率。
    pub scroll_scale: ScrollScale,
    /// ### English
    /// Smooth-scroll delivery speed in pixels per second.
    ///
    /// ### 中文
    /// 平滑滚动投递速度（像素/秒）。
    pub scroll_speed: f32,
    /// ### English
    /// Use sRGB texture formats when the device supports them.
    ///
    /// ### 中文
    /// 设备支持时使用 sRGB 纹理格式。
    pub srgb: bool,
    /// ### English
    /// Skip applying full-surface paints that a later full-cover paint in the same drain replaces.
    ///
    /// ### 中文
    /// 同一次 drain 中若后续存在覆盖整帧的 paint，则跳过之前 full-surface paint 的上传。
    pub coalesce_full_frames: bool,
    /// ### English
    /// Paint-queue depth that triggers a warning log.
    ///
    /// ### 中文
    /// 触发警告日志的 paint 队列深度。
    pub queue_warn_depth: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            smooth_scroll: true,
            scroll_scale: ScrollScale::default(),
            scroll_speed: DEFAULT_SCROLL_SPEED,
            srgb: false,
            coalesce_full_frames: true,
            queue_warn_depth: DEFAULT_QUEUE_WARN_DEPTH,
        }
    }
}

impl SurfaceConfig {
    /// ### English
    /// Replaces non-finite or non-positive numeric fields with their defaults.
    ///
    /// ### 中文
    /// 将非有限或非正的数值字段替换为默认值。
    pub fn sanitized(mut self) -> Self {
        if !(self.scroll_scale.x.is_finite() && self.scroll_scale.x > 0.0) {
            self.scroll_scale.x = DEFAULT_SCROLL_SCALE;
        }
        if !(self.scroll_scale.y.is_finite() && self.scroll_scale.y > 0.0) {
            self.scroll_scale.y = DEFAULT_SCROLL_SCALE;
        }
        if !(self.scroll_speed.is_finite() && self.scroll_speed > 0.0) {
            self.scroll_speed = DEFAULT_SCROLL_SPEED;
        }
        if self.queue_warn_depth == 0 {
            self.queue_warn_depth = DEFAULT_QUEUE_WARN_DEPTH;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SurfaceConfig::default();
        assert!(config.smooth_scroll);
        assert_eq!(config.scroll_scale, ScrollScale { x: 120.0, y: 120.0 });
        assert_eq!(config.scroll_speed, 4800.0);
        assert!(config.coalesce_full_frames);
    }

    #[test]
    fn sanitized_replaces_bad_numbers() {
        let config = SurfaceConfig {
            scroll_scale: ScrollScale {
                x: f32::NAN,
                y: -3.0,
            },
            scroll_speed: 0.0,
            queue_warn_depth: 0,
            ..SurfaceConfig::default()
        }
        .sanitized();
        assert_eq!(config, SurfaceConfig::default());
    }
}
