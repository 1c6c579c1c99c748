//! ### English
//! C ABI bindings for surface lifecycle, sizing, navigation and surface-event polling.
//!
//! ### 中文
//! surface 生命周期、尺寸、导航与 surface 事件轮询相关的 C ABI 绑定。

use std::ffi::{CString, c_char, c_void};
use std::rc::Rc;

use dpi::PhysicalSize;

use super::engine::{HookedEngine, WebSurfaceEngineHooks};
use super::{
    WEB_SURFACE_ERROR_INVALID_ARGUMENT, WebSurface, WebSurfaceConfig, cstr_to_str, read_config,
    status,
};
use crate::engine::config::SurfaceConfig;
use crate::engine::rendering::BackendStreamer;
use crate::engine::rendering::gl::HostGlContext;
use crate::engine::surface::{KeyEventKind, SurfaceEvent, SurfaceHost};
use crate::engine::widget::SurfaceWidget;

pub const WEB_SURFACE_EVENT_NONE: u32 = 0;
pub const WEB_SURFACE_EVENT_MOUSE_MOVE: u32 = 1;
pub const WEB_SURFACE_EVENT_MOUSE_CLICK: u32 = 2;
pub const WEB_SURFACE_EVENT_MOUSE_WHEEL: u32 = 3;
pub const WEB_SURFACE_EVENT_KEY: u32 = 4;
pub const WEB_SURFACE_EVENT_FOCUS: u32 = 5;
pub const WEB_SURFACE_EVENT_RESIZED: u32 = 6;
pub const WEB_SURFACE_EVENT_INVALIDATE: u32 = 7;
pub const WEB_SURFACE_EVENT_LOAD_URL: u32 = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
/// ### English
/// One request for the embedded browser surface (flattened `SurfaceEvent`).
///
/// Field use per `kind`:
/// - `MOUSE_MOVE`: `x`, `y`, `modifiers`, `flag` = mouse left the widget.
/// - `MOUSE_CLICK`: `x`, `y`, `button`, `click_count`, `modifiers`, `flag` = button up.
/// - `MOUSE_WHEEL`: `x`, `y`, `delta_x`, `delta_y`, `modifiers`.
/// - `KEY`: `key_kind` (0 raw down, 1 up, 2 char), `windows_key_code`, `native_key_code`,
///   `modifiers`, `flag` = auto-repeat.
/// - `FOCUS`: `flag` = focused.
/// - `RESIZED`: `width`, `height`.
/// - `LOAD_URL`: `url`, valid until the next poll or surface destruction.
///
/// ### 中文
/// 发给嵌入浏览器 surface 的一个请求（扁平化的 `SurfaceEvent`）。
///
/// 各 `kind` 使用的字段：
/// - `MOUSE_MOVE`：`x`、`y`、`modifiers`，`flag` 表示鼠标离开 widget。
/// - `MOUSE_CLICK`：`x`、`y`、`button`、`click_count`、`modifiers`，`flag` 表示按键抬起。
/// - `MOUSE_WHEEL`：`x`、`y`、`delta_x`、`delta_y`、`modifiers`。
/// - `KEY`：`key_kind`（0 按下、1 抬起、2 字符）、`windows_key_code`、`native_key_code`、
///   `modifiers`，`flag` 表示自动重复。
/// - `FOCUS`：`flag` 表示获得焦点。
/// - `RESIZED`：`width`、`height`。
/// - `LOAD_URL`：`url`，在下一次轮询或 surface 销毁前有效。
pub struct WebSurfaceEvent {
    pub kind: u32,
    pub x: i32,
    pub y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub button: u32,
    pub click_count: u32,
    pub flag: bool,
    pub key_kind: u32,
    pub windows_key_code: u32,
    pub native_key_code: u32,
    pub modifiers: u32,
    pub width: u32,
    pub height: u32,
    pub url: *const c_char,
}

impl Default for WebSurfaceEvent {
    fn default() -> Self {
        Self {
            kind: WEB_SURFACE_EVENT_NONE,
            x: 0,
            y: 0,
            delta_x: 0,
            delta_y: 0,
            button: 0,
            click_count: 0,
            flag: false,
            key_kind: 0,
            windows_key_code: 0,
            native_key_code: 0,
            modifiers: 0,
            width: 0,
            height: 0,
            url: std::ptr::null(),
        }
    }
}

impl WebSurfaceEvent {
    /// ### English
    /// Flattens `event`; a navigation URL is moved into `url_storage`.
    ///
    /// ### 中文
    /// 扁平化 `event`；导航 URL 会被移入 `url_storage`。
    fn flatten(event: SurfaceEvent, url_storage: &mut Option<CString>) -> Self {
        let mut out = Self::default();
        match event {
            SurfaceEvent::MouseMove {
                x,
                y,
                modifiers,
                leave,
            } => {
                out.kind = WEB_SURFACE_EVENT_MOUSE_MOVE;
                (out.x, out.y, out.flag) = (x, y, leave);
                out.modifiers = modifiers.bits();
            }
            SurfaceEvent::MouseClick {
                x,
                y,
                button,
                up,
                click_count,
                modifiers,
            } => {
                out.kind = WEB_SURFACE_EVENT_MOUSE_CLICK;
                (out.x, out.y, out.flag) = (x, y, up);
                out.button = button as u32;
                out.click_count = click_count;
                out.modifiers = modifiers.bits();
            }
            SurfaceEvent::MouseWheel {
                x,
                y,
                delta_x,
                delta_y,
                modifiers,
            } => {
                out.kind = WEB_SURFACE_EVENT_MOUSE_WHEEL;
                (out.x, out.y) = (x, y);
                (out.delta_x, out.delta_y) = (delta_x, delta_y);
                out.modifiers = modifiers.bits();
            }
            SurfaceEvent::Key(key) => {
                out.kind = WEB_SURFACE_EVENT_KEY;
                out.key_kind = match key.kind {
                    KeyEventKind::RawKeyDown => 0,
                    KeyEventKind::KeyUp => 1,
                    KeyEventKind::Char => 2,
                };
                out.windows_key_code = key.windows_key_code;
                out.native_key_code = key.native_key_code;
                out.modifiers = key.modifiers.bits();
                out.flag = key.repeat;
            }
            SurfaceEvent::Focus(focused) => {
                out.kind = WEB_SURFACE_EVENT_FOCUS;
                out.flag = focused;
            }
            SurfaceEvent::Resized { width, height } => {
                out.kind = WEB_SURFACE_EVENT_RESIZED;
                (out.width, out.height) = (width, height);
            }
            SurfaceEvent::Invalidate => out.kind = WEB_SURFACE_EVENT_INVALIDATE,
            SurfaceEvent::LoadUrl(url) => {
                // A parsed URL never contains NUL.
                *url_storage = CString::new(String::from(url)).ok();
                out.kind = WEB_SURFACE_EVENT_LOAD_URL;
                out.url = url_storage
                    .as_ref()
                    .map_or(std::ptr::null(), |url| url.as_ptr());
            }
        }
        out
    }
}

/// ### English
/// # Safety
/// `config` and `hooks` must each be NULL or valid.
///
/// ### 中文
/// # Safety
/// `config` 与 `hooks` 必须为 NULL 或合法指针。
pub(super) unsafe fn create(
    window_id: u32,
    config: SurfaceConfig,
    backend: BackendStreamer,
    hooks: *const WebSurfaceEngineHooks,
) -> *mut WebSurface {
    let (sender, events) = crossbeam_channel::unbounded();
    let host: Rc<dyn SurfaceHost> = Rc::new(sender);

    let widget = match unsafe { HookedEngine::from_ptr(hooks) } {
        Some(engine) => SurfaceWidget::with_engine(&engine, window_id, backend, host, &config),
        None => Ok(SurfaceWidget::new(window_id, backend, host, &config)),
    };
    let Ok(widget) = widget else {
        return std::ptr::null_mut();
    };

    Box::into_raw(Box::new(WebSurface {
        widget,
        events,
        polled_url: None,
    }))
}

#[unsafe(no_mangle)]
/// ### English
/// Creates a surface compositing into the host's current OpenGL context.
///
/// Must be called on the host render thread with that context current. `config` and `hooks`
/// may be NULL; with non-NULL `hooks` the browser engine is initialized first (once per process).
/// Returns NULL on failure.
///
/// ### 中文
/// 创建一个合成到宿主当前 OpenGL 上下文的 surface。
///
/// 必须在宿主渲染线程、且该上下文为 current 时调用。`config` 与 `hooks` 可为 NULL；
/// `hooks` 非 NULL 时会先初始化浏览器引擎（每进程一次）。失败返回 NULL。
pub unsafe extern "C" fn web_surface_create_gl(
    config: *const WebSurfaceConfig,
    hooks: *const WebSurfaceEngineHooks,
    get_proc_address: Option<
        unsafe extern "C" fn(name: *const c_char, user_data: *mut c_void) -> *const c_void,
    >,
    user_data: *mut c_void,
) -> *mut WebSurface {
    let Some(get_proc_address) = get_proc_address else {
        return std::ptr::null_mut();
    };
    let (window_id, config) = unsafe { read_config(config) };

    let context = unsafe { HostGlContext::load_with_c(get_proc_address, user_data) };
    let backend = BackendStreamer::OpenGl(context.streamer(config.srgb));
    unsafe { create(window_id, config, backend, hooks) }
}

#[cfg(windows)]
#[unsafe(no_mangle)]
/// ### English
/// Creates a surface compositing through the host's `ID3D11Device` and immediate
/// `ID3D11DeviceContext`. Both are AddRef'd for the surface's lifetime.
///
/// Returns NULL on failure.
///
/// ### 中文
/// 创建一个通过宿主 `ID3D11Device` 与立即上下文 `ID3D11DeviceContext` 合成的 surface；
/// 两者在 surface 生命周期内各持有一次引用。
///
/// 失败返回 NULL。
pub unsafe extern "C" fn web_surface_create_d3d11(
    config: *const WebSurfaceConfig,
    hooks: *const WebSurfaceEngineHooks,
    device: *mut c_void,
    context: *mut c_void,
) -> *mut WebSurface {
    use crate::engine::rendering::d3d11::{D3D11Device, D3D11Streamer};

    if device.is_null() || context.is_null() {
        return std::ptr::null_mut();
    }
    let (window_id, config) = unsafe { read_config(config) };
    let Some(device) = (unsafe { D3D11Device::from_raw(device, context) }) else {
        return std::ptr::null_mut();
    };
    let backend = BackendStreamer::D3D11(D3D11Streamer::new(Box::new(device), config.srgb));
    unsafe { create(window_id, config, backend, hooks) }
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys a surface and releases its GPU texture. Call on the host render thread with the
/// surface's graphics context current. Paint sinks acquired from it stay valid but drop
/// everything they receive afterwards.
///
/// ### 中文
/// 销毁 surface 并释放其 GPU 纹理；需在宿主渲染线程、且对应图形上下文为 current 时调用。
/// 从中获取的 paint sink 仍然有效，但之后收到的内容都会被丢弃。
pub unsafe extern "C" fn web_surface_destroy(surface: *mut WebSurface) {
    if surface.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(surface));
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Resizes the surface (in physical pixels) ahead of the next `web_surface_frame`.
/// Zero dimensions are clamped to 1.
///
/// ### 中文
/// 在下一次 `web_surface_frame` 之前调整 surface 尺寸（物理像素）；为 0 的尺寸会被钳制为 1。
pub unsafe extern "C" fn web_surface_set_size(surface: *mut WebSurface, width: u32, height: u32) {
    if surface.is_null() {
        return;
    }
    unsafe { (*surface).widget.set_size(PhysicalSize::new(width, height)) };
}

#[unsafe(no_mangle)]
/// ### English
/// Asks the embedded surface to load `url` (NUL-terminated UTF-8).
///
/// ### 中文
/// 请求嵌入 surface 加载 `url`（NUL 结尾的 UTF-8）。
pub unsafe extern "C" fn web_surface_navigate(surface: *mut WebSurface, url: *const c_char) -> i32 {
    if surface.is_null() {
        return WEB_SURFACE_ERROR_INVALID_ARGUMENT;
    }
    let Some(url) = (unsafe { cstr_to_str(url) }) else {
        return WEB_SURFACE_ERROR_INVALID_ARGUMENT;
    };
    status(unsafe { (*surface).widget.navigate(url) })
}

#[unsafe(no_mangle)]
/// ### English
/// Pops the next request for the embedded browser surface.
///
/// Returns `false` (and leaves `out_event` untouched) when none is pending.
///
/// ### 中文
/// 取出下一个发给嵌入浏览器 surface 的请求。
///
/// 没有待处理请求时返回 `false`（且不修改 `out_event`）。
pub unsafe extern "C" fn web_surface_poll_event(
    surface: *mut WebSurface,
    out_event: *mut WebSurfaceEvent,
) -> bool {
    if surface.is_null() || out_event.is_null() {
        return false;
    }
    let surface = unsafe { &mut *surface };
    let Ok(event) = surface.events.try_recv() else {
        return false;
    };
    let flat = WebSurfaceEvent::flatten(event, &mut surface.polled_url);
    unsafe { out_event.write(flat) };
    true
}

#[unsafe(no_mangle)]
/// ### English
/// Number of paint buffers waiting for the next frame.
///
/// ### 中文
/// 等待下一帧处理的 paint 缓冲区数量。
pub unsafe extern "C" fn web_surface_queued_frames(surface: *const WebSurface) -> u32 {
    if surface.is_null() {
        return 0;
    }
    unsafe { (*surface).widget.render_host().queued_frames() as u32 }
}
