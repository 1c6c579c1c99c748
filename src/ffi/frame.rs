//! ### English
//! C ABI bindings for the per-frame widget call and frame statistics.
//!
//! ### 中文
//! 每帧 widget 调用与帧统计相关的 C ABI 绑定。

use std::ffi::c_void;

use dpi::PhysicalSize;

use super::{WEB_SURFACE_ERROR_INVALID_ARGUMENT, WEB_SURFACE_OK, WebSurface};
use crate::engine::rendering::{CursorShape, FrameDrawList, TextureId};
use crate::engine::widget::WidgetFrame;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
/// ### English
/// Layout and interaction state the host GUI computed for the surface this frame.
///
/// ### 中文
/// 宿主 GUI 本帧为 surface 计算出的布局与交互状态。
pub struct WebSurfaceFrameInfo {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: u32,
    pub height: u32,
    pub hovered: bool,
    pub focused: bool,
    /// ### English
    /// Seconds since the previous frame.
    ///
    /// ### 中文
    /// 距上一帧的秒数。
    pub delta_time: f32,
}

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Host draw-list callbacks.
///
/// `add_image(user_data, texture, min_x, min_y, max_x, max_y)` receives the GL texture name or the
/// D3D11 shader resource view pointer. `set_cursor(user_data, shape)` receives the cursor shape
/// (0 arrow, 1 text input, 2 resize all, 3 resize N-S, 4 resize E-W, 5 resize NE-SW,
/// 6 resize NW-SE, 7 hand, 8 not allowed).
///
/// ### 中文
/// 宿主绘制列表回调。
///
/// `add_image(user_data, texture, min_x, min_y, max_x, max_y)` 收到 GL 纹理名或 D3D11
/// shader resource view 指针；`set_cursor(user_data, shape)` 收到光标形状
/// （0 箭头、1 文本输入、2 全向缩放、3 南北缩放、4 东西缩放、5 东北-西南缩放、
/// 6 西北-东南缩放、7 手形、8 禁止）。
pub struct WebSurfaceDrawCallbacks {
    pub user_data: *mut c_void,
    pub add_image: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            texture: u64,
            min_x: f32,
            min_y: f32,
            max_x: f32,
            max_y: f32,
        ),
    >,
    pub set_cursor: Option<unsafe extern "C" fn(user_data: *mut c_void, shape: u32)>,
}

impl FrameDrawList for WebSurfaceDrawCallbacks {
    fn add_image(&mut self, texture: TextureId, min: [f32; 2], max: [f32; 2]) {
        if let Some(add_image) = self.add_image {
            unsafe { add_image(self.user_data, texture.0, min[0], min[1], max[0], max[1]) };
        }
    }

    fn set_mouse_cursor(&mut self, cursor: CursorShape) {
        if let Some(set_cursor) = self.set_cursor {
            unsafe { set_cursor(self.user_data, cursor as u32) };
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
/// ### English
/// Per-frame output and cumulative statistics.
///
/// ### 中文
/// 每帧输出与累计统计。
pub struct WebSurfaceFrameResult {
    /// ### English
    /// The host should move keyboard focus to this surface.
    ///
    /// ### 中文
    /// 宿主应把键盘焦点移到该 surface。
    pub request_keyboard_focus: bool,
    pub frames_applied: u64,
    pub frames_coalesced: u64,
    pub overlays_dropped: u64,
    pub full_recreates: u64,
    pub partial_updates: u64,
    pub forced_recreates: u64,
}

#[unsafe(no_mangle)]
/// ### English
/// Runs one host frame for the surface: layout, hover/focus transitions, smooth-scroll delivery,
/// paint queue drain and texture streaming, then emits the textured quad through `callbacks`.
///
/// Call on the host render thread with the surface's graphics context current.
/// `out_result` may be NULL. Returns `WEB_SURFACE_OK` or a negative status code; a texture
/// creation failure or lost device is fatal for this surface (destroy and recreate it).
///
/// ### 中文
/// 为 surface 执行一个宿主帧：布局、悬停/焦点切换、平滑滚动投递、paint 队列 drain 与纹理上传，
/// 然后通过 `callbacks` 输出纹理四边形。
///
/// 需在宿主渲染线程、且 surface 的图形上下文为 current 时调用。`out_result` 可为 NULL。
/// 返回 `WEB_SURFACE_OK` 或负数状态码；纹理创建失败或设备丢失对该 surface 是致命的
/// （请销毁并重新创建）。
pub unsafe extern "C" fn web_surface_frame(
    surface: *mut WebSurface,
    info: *const WebSurfaceFrameInfo,
    callbacks: *const WebSurfaceDrawCallbacks,
    out_result: *mut WebSurfaceFrameResult,
) -> i32 {
    if surface.is_null() || info.is_null() || callbacks.is_null() {
        return WEB_SURFACE_ERROR_INVALID_ARGUMENT;
    }

    let widget = unsafe { &mut (*surface).widget };
    let info = unsafe { *info };
    let mut callbacks = unsafe { *callbacks };
    let frame = WidgetFrame {
        origin: [info.origin_x, info.origin_y],
        size: PhysicalSize::new(info.width, info.height),
        hovered: info.hovered,
        focused: info.focused,
        delta_time: info.delta_time,
    };

    let response = match widget.frame(frame, &mut callbacks) {
        Ok(response) => response,
        Err(err) => {
            log::error!("surface frame failed: {err}");
            return err.status_code();
        }
    };

    if !out_result.is_null() {
        let stats = widget.stats();
        unsafe {
            out_result.write(WebSurfaceFrameResult {
                request_keyboard_focus: response.request_keyboard_focus,
                frames_applied: stats.frames_applied,
                frames_coalesced: stats.frames_coalesced,
                overlays_dropped: stats.overlays_dropped,
                full_recreates: stats.full_recreates,
                partial_updates: stats.partial_updates,
                forced_recreates: stats.forced_recreates,
            });
        }
    }
    WEB_SURFACE_OK
}
