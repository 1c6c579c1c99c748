//! ### English
//! Raw host platform input, keyed by window id.
//!
//! Pointer positions are global (desktop) coordinates; key codes use the SDL keycode space.
//!
//! ### 中文
//! 宿主平台原始输入，按 window id 区分。
//!
//! 指针位置为全局（桌面）坐标；键码使用 SDL keycode 空间。

/// ### English
/// Capacity of a text-input payload (NUL-terminated UTF-8).
///
/// ### 中文
/// 文本输入负载的容量（以 NUL 结尾的 UTF-8）。
pub const TEXT_INPUT_CAPACITY: usize = 32;

/// ### English
/// Platform button ids.
///
/// ### 中文
/// 平台按键 id。
pub const PLATFORM_BUTTON_LEFT: u8 = 1;
pub const PLATFORM_BUTTON_MIDDLE: u8 = 2;
pub const PLATFORM_BUTTON_RIGHT: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlatformEvent {
    MouseMotion {
        window_id: u32,
        x: f32,
        y: f32,
    },
    MouseButton {
        window_id: u32,
        button: u8,
        pressed: bool,
        clicks: u8,
        x: f32,
        y: f32,
    },
    /// ### English
    /// Wheel notches (`y > 0` scrolls up) at pointer position `x`, `y`.
    ///
    /// ### 中文
    /// 滚轮刻度（`y > 0` 向上滚动），指针位置为 `x`、`y`。
    MouseWheel {
        window_id: u32,
        delta_x: f32,
        delta_y: f32,
        x: f32,
        y: f32,
    },
    Key {
        window_id: u32,
        keycode: u32,
        scancode: u32,
        pressed: bool,
        repeat: bool,
    },
    TextInput {
        window_id: u32,
        text: [u8; TEXT_INPUT_CAPACITY],
    },
}

impl PlatformEvent {
    pub fn window_id(&self) -> u32 {
        match *self {
            PlatformEvent::MouseMotion { window_id, .. }
            | PlatformEvent::MouseButton { window_id, .. }
            | PlatformEvent::MouseWheel { window_id, .. }
            | PlatformEvent::Key { window_id, .. }
            | PlatformEvent::TextInput { window_id, .. } => window_id,
        }
    }

    /// ### English
    /// Builds a text-input event, truncating `text` at a character boundary to fit.
    ///
    /// ### 中文
    /// 构造文本输入事件；必要时在字符边界处截断 `text` 以适配容量。
    pub fn text(window_id: u32, text: &str) -> Self {
        let mut payload = [0u8; TEXT_INPUT_CAPACITY];
        let mut end = text.len().min(TEXT_INPUT_CAPACITY - 1);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        payload[..end].copy_from_slice(&text.as_bytes()[..end]);
        PlatformEvent::TextInput {
            window_id,
            text: payload,
        }
    }
}
