//! ### English
//! C ABI bindings for feeding platform input events into a surface.
//!
//! ### 中文
//! 向 surface 输入平台事件的 C ABI 绑定。

use super::WebSurface;
use crate::engine::input::{PlatformEvent, TEXT_INPUT_CAPACITY};

pub const WEB_SURFACE_INPUT_MOUSE_MOTION: u32 = 1;
pub const WEB_SURFACE_INPUT_MOUSE_BUTTON: u32 = 2;
pub const WEB_SURFACE_INPUT_MOUSE_WHEEL: u32 = 3;
pub const WEB_SURFACE_INPUT_KEY: u32 = 4;
pub const WEB_SURFACE_INPUT_TEXT: u32 = 5;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
/// ### English
/// One platform input event (SDL-style). Mouse positions are in global/desktop coordinates.
///
/// Field use per `kind`:
/// - `MOUSE_MOTION`: `x`, `y`.
/// - `MOUSE_BUTTON`: `button` (1 left, 2 middle, 3 right), `pressed`, `clicks`, `x`, `y`.
/// - `MOUSE_WHEEL`: `delta_x`, `delta_y` (notches, `y > 0` scrolls up), `x`, `y`.
/// - `KEY`: `keycode`, `scancode`, `pressed`, `repeat`.
/// - `TEXT`: `text` (NUL-terminated UTF-8).
///
/// ### 中文
/// 一个平台输入事件（SDL 风格）。鼠标坐标为全局/桌面坐标。
///
/// 各 `kind` 使用的字段：
/// - `MOUSE_MOTION`：`x`、`y`。
/// - `MOUSE_BUTTON`：`button`（1 左、2 中、3 右）、`pressed`、`clicks`、`x`、`y`。
/// - `MOUSE_WHEEL`：`delta_x`、`delta_y`（刻度，`y > 0` 向上滚动）、`x`、`y`。
/// - `KEY`：`keycode`、`scancode`、`pressed`、`repeat`。
/// - `TEXT`：`text`（NUL 结尾的 UTF-8）。
pub struct WebSurfaceInputEvent {
    pub kind: u32,
    pub window_id: u32,
    pub x: f32,
    pub y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
    pub button: u8,
    pub clicks: u8,
    pub pressed: bool,
    pub repeat: bool,
    pub keycode: u32,
    pub scancode: u32,
    pub text: [u8; TEXT_INPUT_CAPACITY],
}

impl WebSurfaceInputEvent {
    fn to_platform(&self) -> Option<PlatformEvent> {
        let window_id = self.window_id;
        let event = match self.kind {
            WEB_SURFACE_INPUT_MOUSE_MOTION => PlatformEvent::MouseMotion {
                window_id,
                x: self.x,
                y: self.y,
            },
            WEB_SURFACE_INPUT_MOUSE_BUTTON => PlatformEvent::MouseButton {
                window_id,
                button: self.button,
                pressed: self.pressed,
                clicks: self.clicks,
                x: self.x,
                y: self.y,
            },
            WEB_SURFACE_INPUT_MOUSE_WHEEL => PlatformEvent::MouseWheel {
                window_id,
                delta_x: self.delta_x,
                delta_y: self.delta_y,
                x: self.x,
                y: self.y,
            },
            WEB_SURFACE_INPUT_KEY => PlatformEvent::Key {
                window_id,
                keycode: self.keycode,
                scancode: self.scancode,
                pressed: self.pressed,
                repeat: self.repeat,
            },
            WEB_SURFACE_INPUT_TEXT => PlatformEvent::TextInput {
                window_id,
                text: self.text,
            },
            _ => return None,
        };
        Some(event)
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Sends a batch of platform input events to a surface.
///
/// Returns the number of events forwarded to the embedded surface. Events for other windows,
/// events outside the hover/focus scope and unknown kinds are consumed without forwarding.
///
/// ### 中文
/// 向 surface 发送一批平台输入事件。
///
/// 返回实际转发给嵌入 surface 的事件数量。其它窗口的事件、不在悬停/焦点范围内的事件以及
/// 未知类型会被消费但不转发。
pub unsafe extern "C" fn web_surface_handle_events(
    surface: *mut WebSurface,
    events: *const WebSurfaceInputEvent,
    count: u32,
) -> u32 {
    if surface.is_null() || events.is_null() || count == 0 {
        return 0;
    }

    let widget = unsafe { &mut (*surface).widget };
    let events = unsafe { std::slice::from_raw_parts(events, count as usize) };
    let mut forwarded = 0;
    for event in events {
        let Some(event) = event.to_platform() else {
            log::trace!("unknown input kind {}", event.kind);
            continue;
        };
        if widget.handle_event(&event) {
            forwarded += 1;
        }
    }
    forwarded
}
