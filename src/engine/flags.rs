//! ### English
//! Bitflags controlling optional surface behaviors.
//!
//! These are passed through the C ABI as a `u32` bitmask (`WebSurfaceConfig.flags`).
//!
//! ### 中文
//! 控制 surface 可选行为的位标志（bitflags）。
//!
//! 通过 C ABI 以 `u32` 位掩码传入（`WebSurfaceConfig.flags`）。
use super::config::SurfaceConfig;

/// ### English
/// Forward wheel input immediately instead of spreading it across frames.
///
/// ### 中文
/// 立即转发滚轮输入，而不是分摊到多帧。
pub const WEB_SURFACE_FLAG_NO_SMOOTH_SCROLL: u32 = 1 << 0;

/// ### English
/// Prefer sRGB texture formats (`SRGB8_ALPHA8` / `B8G8R8A8_UNORM_SRGB`).
///
/// ### 中文
/// 优先使用 sRGB 纹理格式（`SRGB8_ALPHA8` / `B8G8R8A8_UNORM_SRGB`）。
pub const WEB_SURFACE_FLAG_SRGB: u32 = 1 << 1;

/// ### English
/// Apply every queued full-surface paint, even when a later full-cover paint replaces it.
///
/// ### 中文
/// 上传每一个排队的 full-surface paint，即使后续存在覆盖整帧的 paint。
pub const WEB_SURFACE_FLAG_NO_COALESCE: u32 = 1 << 2;

/// ### English
/// Applies a flag bitmask on top of `config`.
///
/// ### 中文
/// 在 `config` 之上应用位掩码。
pub(crate) fn apply_flags(mut config: SurfaceConfig, flags: u32) -> SurfaceConfig {
    config.smooth_scroll = flags & WEB_SURFACE_FLAG_NO_SMOOTH_SCROLL == 0;
    config.srgb = flags & WEB_SURFACE_FLAG_SRGB != 0;
    config.coalesce_full_frames = flags & WEB_SURFACE_FLAG_NO_COALESCE == 0;
    config
}
