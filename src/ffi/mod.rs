//! ### English
//! C ABI surface for `web_surface`.
//!
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`.
//! Functions returning `i32` use `WEB_SURFACE_OK` (0) for success and a negative status code
//! otherwise. Strings passed in must be NUL-terminated UTF-8.
//!
//! Threading: a `WebSurface` is owned by the host render thread. A `WebSurfacePaintSink` may be
//! used from any thread (typically the browser's paint thread).
//!
//! ### 中文
//! `web_surface` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。
//! 返回 `i32` 的函数成功时返回 `WEB_SURFACE_OK`（0），失败时返回负数状态码。
//! 传入的字符串必须是以 NUL 结尾的 UTF-8。
//!
//! 线程：`WebSurface` 归宿主渲染线程所有；`WebSurfacePaintSink` 可在任意线程使用
//! （通常是浏览器的 paint 线程）。
mod abi;
mod engine;
mod frame;
mod input;
mod paint;
mod surface;

use std::ffi::{CStr, CString, c_char};

use crossbeam_channel::Receiver;

use crate::engine::config::{ScrollScale, SurfaceConfig};
use crate::engine::flags::apply_flags;
use crate::engine::paint::PaintSink;
use crate::engine::surface::SurfaceEvent;
use crate::engine::widget::SurfaceWidget;

/// ### English
/// C ABI version for `web_surface`.
///
/// ### 中文
/// `web_surface` 的 C ABI 版本号。
const WEB_SURFACE_ABI_VERSION: u32 = 1;

pub const WEB_SURFACE_OK: i32 = 0;

/// ### English
/// A required pointer argument was NULL, or a string was not valid UTF-8.
///
/// ### 中文
/// 必需的指针参数为 NULL，或字符串不是合法 UTF-8。
pub const WEB_SURFACE_ERROR_INVALID_ARGUMENT: i32 = -100;

/// ### English
/// Opaque surface handle (host render thread only).
///
/// ### 中文
/// 不透明 surface 句柄（仅限宿主渲染线程）。
pub struct WebSurface {
    widget: SurfaceWidget,
    /// ### English
    /// Embedded-surface events waiting for `web_surface_poll_event`.
    ///
    /// ### 中文
    /// 等待 `web_surface_poll_event` 取走的嵌入 surface 事件。
    events: Receiver<SurfaceEvent>,
    /// ### English
    /// Backing storage for the URL pointer handed out by the last polled navigation event.
    ///
    /// ### 中文
    /// 最近一次取出的导航事件中 URL 指针的底层存储。
    polled_url: Option<CString>,
}

/// ### English
/// Opaque paint producer handle (thread-safe).
///
/// ### 中文
/// 不透明 paint 生产者句柄（线程安全）。
pub struct WebSurfacePaintSink {
    sink: PaintSink,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
/// ### English
/// Surface creation options. Zero numeric fields fall back to defaults.
///
/// ### 中文
/// surface 创建选项；数值字段为 0 时使用默认值。
pub struct WebSurfaceConfig {
    /// ### English
    /// Platform window whose input events the surface consumes.
    ///
    /// ### 中文
    /// surface 消费其输入事件的平台窗口。
    pub window_id: u32,
    /// ### English
    /// `WEB_SURFACE_FLAG_*` bitmask.
    ///
    /// ### 中文
    /// `WEB_SURFACE_FLAG_*` 位掩码。
    pub flags: u32,
    pub scroll_scale_x: f32,
    pub scroll_scale_y: f32,
    pub scroll_speed: f32,
    pub queue_warn_depth: u32,
}

impl WebSurfaceConfig {
    fn to_config(self) -> SurfaceConfig {
        let mut config = apply_flags(SurfaceConfig::default(), self.flags);
        config.scroll_scale = ScrollScale {
            x: self.scroll_scale_x,
            y: self.scroll_scale_y,
        };
        config.scroll_speed = self.scroll_speed;
        config.queue_warn_depth = self.queue_warn_depth as usize;
        // Zero and otherwise unusable values fall back to defaults here.
        config.sanitized()
    }
}

/// ### English
/// Reads an optional config pointer (NULL means all defaults).
///
/// # Safety
/// `config` must be NULL or point to a valid `WebSurfaceConfig`.
///
/// ### 中文
/// 读取可选的配置指针（NULL 表示全部默认）。
///
/// # Safety
/// `config` 必须为 NULL 或指向合法的 `WebSurfaceConfig`。
unsafe fn read_config(config: *const WebSurfaceConfig) -> (u32, SurfaceConfig) {
    if config.is_null() {
        return (0, SurfaceConfig::default());
    }
    let config = unsafe { *config };
    (config.window_id, config.to_config())
}

/// ### English
/// Converts a NUL-terminated UTF-8 C string into `&str`.
///
/// Returns `None` for NULL pointers or invalid UTF-8.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string valid for `'a`.
///
/// ### 中文
/// 将 NUL 结尾的 UTF-8 C 字符串转换为 `&str`。
///
/// 对 NULL 指针或非法 UTF-8 返回 `None`。
///
/// # Safety
/// `ptr` 必须为 NULL，或指向在 `'a` 期间有效的 NUL 结尾字符串。
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn status<T>(result: Result<T, crate::engine::error::SurfaceError>) -> i32 {
    match result {
        Ok(_) => WEB_SURFACE_OK,
        Err(err) => {
            log::debug!("C ABI call failed: {err}");
            err.status_code()
        }
    }
}
