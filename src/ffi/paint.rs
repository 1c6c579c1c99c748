//! ### English
//! C ABI bindings for the browser-side paint and cursor callbacks.
//!
//! ### 中文
//! 浏览器侧 paint 与光标回调相关的 C ABI 绑定。

use dpi::PhysicalSize;

use super::{WEB_SURFACE_ERROR_INVALID_ARGUMENT, WebSurface, WebSurfacePaintSink, status};
use crate::engine::error::SurfaceError;
use crate::engine::frame::{DirtyRect, PaintKind};

#[unsafe(no_mangle)]
/// ### English
/// Acquires a thread-safe paint sink for `surface`. Release it with
/// `web_surface_paint_sink_release`; it may outlive the surface.
///
/// ### 中文
/// 为 `surface` 获取线程安全的 paint sink；使用 `web_surface_paint_sink_release` 释放，
/// 其生命周期可以长于 surface。
pub unsafe extern "C" fn web_surface_paint_sink_acquire(
    surface: *const WebSurface,
) -> *mut WebSurfacePaintSink {
    if surface.is_null() {
        return std::ptr::null_mut();
    }
    let sink = unsafe { (*surface).widget.paint_sink() };
    Box::into_raw(Box::new(WebSurfacePaintSink { sink }))
}

#[unsafe(no_mangle)]
/// ### English
/// Releases a sink acquired by `web_surface_paint_sink_acquire`.
///
/// ### 中文
/// 释放由 `web_surface_paint_sink_acquire` 获取的 sink。
pub unsafe extern "C" fn web_surface_paint_sink_release(sink: *mut WebSurfacePaintSink) {
    if sink.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(sink));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Paint callback: copies `buffer` (BGRA8, `width * height * 4` bytes, tightly packed) and queues
/// it for the next frame. `buffer` only needs to stay valid for the duration of the call.
///
/// `kind`: `0` = view, `1` = popup. The dirty rect is clamped into the frame.
///
/// ### 中文
/// paint 回调：拷贝 `buffer`（BGRA8，`width * height * 4` 字节，紧密排列）并排入下一帧。
/// `buffer` 只需在本次调用期间有效。
///
/// `kind`：`0` = view，`1` = popup。脏矩形会被裁剪到帧内。
pub unsafe extern "C" fn web_surface_on_paint(
    sink: *const WebSurfacePaintSink,
    kind: u32,
    dirty_x: i32,
    dirty_y: i32,
    dirty_width: i32,
    dirty_height: i32,
    buffer: *const u8,
    width: u32,
    height: u32,
) -> i32 {
    if sink.is_null() || buffer.is_null() {
        return WEB_SURFACE_ERROR_INVALID_ARGUMENT;
    }
    let Some(kind) = PaintKind::from_raw(kind) else {
        return status(Err::<(), _>(SurfaceError::InvalidFrame(format!(
            "unknown paint kind {kind}"
        ))));
    };
    let dirty = DirtyRect::clamped(dirty_x, dirty_y, dirty_width, dirty_height, width, height);
    let sink = unsafe { &(*sink).sink };
    status(unsafe { sink.on_paint_raw(kind, dirty, buffer, PhysicalSize::new(width, height)) })
}

#[unsafe(no_mangle)]
/// ### English
/// Cursor callback: records the browser's platform cursor kind for the next hovered frame.
///
/// ### 中文
/// 光标回调：记录浏览器的平台光标类型，供下一个悬停帧使用。
pub unsafe extern "C" fn web_surface_on_cursor_change(
    sink: *const WebSurfacePaintSink,
    cursor: u32,
) {
    if sink.is_null() {
        return;
    }
    unsafe { (*sink).sink.on_cursor_change(cursor) };
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::engine::config::SurfaceConfig;
    use crate::engine::rendering::BackendStreamer;
    use crate::engine::rendering::gl::GlStreamer;
    use crate::engine::rendering::software::SoftwareGl;
    use crate::ffi::surface::{create, web_surface_destroy, web_surface_queued_frames};

    struct SendSink(*mut WebSurfacePaintSink);
    unsafe impl Send for SendSink {}

    fn surface() -> *mut WebSurface {
        unsafe {
            create(
                0,
                SurfaceConfig::default(),
                BackendStreamer::OpenGl(GlStreamer::new(Box::new(SoftwareGl::new()), false)),
                std::ptr::null(),
            )
        }
    }

    #[test]
    fn paints_from_another_thread_are_queued() {
        let surface = surface();
        let sink = SendSink(unsafe { web_surface_paint_sink_acquire(surface) });
        let producer = thread::spawn(move || {
            let sink = sink;
            let pixels = vec![0u8; 8 * 8 * 4];
            let code =
                unsafe { web_surface_on_paint(sink.0, 0, 0, 0, 8, 8, pixels.as_ptr(), 8, 8) };
            unsafe { web_surface_paint_sink_release(sink.0) };
            code
        });
        assert_eq!(producer.join().unwrap(), 0);
        unsafe {
            assert_eq!(web_surface_queued_frames(surface), 1);
            web_surface_destroy(surface);
        }
    }

    #[test]
    fn bad_paint_arguments_report_status_codes() {
        let surface = surface();
        let sink = unsafe { web_surface_paint_sink_acquire(surface) };
        let pixels = vec![0u8; 4 * 4 * 4];
        unsafe {
            assert_eq!(
                web_surface_on_paint(sink, 0, 0, 0, 4, 4, std::ptr::null(), 4, 4),
                WEB_SURFACE_ERROR_INVALID_ARGUMENT
            );
            assert_eq!(web_surface_on_paint(sink, 7, 0, 0, 4, 4, pixels.as_ptr(), 4, 4), -2);
            assert_eq!(web_surface_on_paint(sink, 0, 0, 0, 4, 4, pixels.as_ptr(), 0, 4), -2);

            web_surface_destroy(surface);
            assert_eq!(web_surface_on_paint(sink, 0, 0, 0, 4, 4, pixels.as_ptr(), 4, 4), -7);
            web_surface_on_cursor_change(sink, 2);
            web_surface_paint_sink_release(sink);
        }
    }
}
