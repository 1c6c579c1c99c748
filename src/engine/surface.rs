//! ### English
//! Input/notification model of the embedded browser surface.
//!
//! The browser host object is external; everything this crate asks of it (mouse, keyboard,
//! focus, resize, invalidate, navigation) is expressed as a `SurfaceEvent` handed to a
//! `SurfaceHost`.
//!
//! ### 中文
//! 嵌入式浏览器 surface 的输入/通知模型。
//!
//! 浏览器 host 对象位于外部；本 crate 对它的所有请求（鼠标、键盘、焦点、resize、invalidate、导航）
//! 都表示为交给 `SurfaceHost` 的 `SurfaceEvent`。
use crossbeam_channel::Sender;
use url::Url;

use crate::engine::input::EventFlags;

/// ### English
/// Mouse button as understood by the embedded surface.
///
/// ### 中文
/// 嵌入 surface 理解的鼠标按键。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

/// ### English
/// Key event kinds forwarded to the embedded surface.
///
/// ### 中文
/// 转发给嵌入 surface 的按键事件类型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum KeyEventKind {
    RawKeyDown = 0,
    KeyUp = 1,
    Char = 2,
}

/// ### English
/// One key or character event.
///
/// For `Char` events `windows_key_code` carries the UTF-32 character, as the browser expects.
///
/// ### 中文
/// 单个按键或字符事件。
///
/// 对于 `Char` 事件，`windows_key_code` 携带 UTF-32 字符（浏览器即按此解释）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub windows_key_code: u32,
    pub native_key_code: u32,
    pub character: Option<char>,
    pub modifiers: EventFlags,
    /// ### English
    /// Auto-repeat press generated by the platform while the key stays held.
    ///
    /// ### 中文
    /// 按键保持按下时由平台产生的自动重复按下。
    pub repeat: bool,
}

/// ### English
/// Everything the compositing bridge and the input translator send to the embedded surface.
///
/// Coordinates are widget-local pixels.
///
/// ### 中文
/// 合成桥与输入转换器发送给嵌入 surface 的全部事件。
///
/// 坐标为 widget 局部像素。
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    MouseMove {
        x: i32,
        y: i32,
        modifiers: EventFlags,
        /// ### English
        /// `true` when the pointer left the widget.
        ///
        /// ### 中文
        /// 指针离开 widget 时为 `true`。
        leave: bool,
    },
    MouseClick {
        x: i32,
        y: i32,
        button: MouseButton,
        up: bool,
        click_count: u32,
        modifiers: EventFlags,
    },
    MouseWheel {
        x: i32,
        y: i32,
        delta_x: i32,
        delta_y: i32,
        modifiers: EventFlags,
    },
    Key(KeyEvent),
    Focus(bool),
    /// ### English
    /// Notify move/resize at the new logical size.
    ///
    /// ### 中文
    /// 以新的逻辑尺寸通知 move/resize。
    Resized {
        width: u32,
        height: u32,
    },
    /// ### English
    /// Request a fresh full-surface paint.
    ///
    /// ### 中文
    /// 请求一次新的 full-surface paint。
    Invalidate,
    LoadUrl(Url),
}

/// ### English
/// Receiver side of the embedded-surface input API.
///
/// ### 中文
/// 嵌入 surface 输入 API 的接收端。
pub trait SurfaceHost {
    fn submit(&self, event: SurfaceEvent);
}

impl SurfaceHost for Sender<SurfaceEvent> {
    fn submit(&self, event: SurfaceEvent) {
        if self.send(event).is_err() {
            log::trace!("surface event dropped: receiver gone");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::{SurfaceEvent, SurfaceHost};

    /// ### English
    /// Records submitted events in order.
    ///
    /// ### 中文
    /// 按顺序记录提交的事件。
    #[derive(Default)]
    pub(crate) struct RecordingHost {
        pub(crate) events: RefCell<Vec<SurfaceEvent>>,
    }

    impl RecordingHost {
        pub(crate) fn take(&self) -> Vec<SurfaceEvent> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    impl SurfaceHost for RecordingHost {
        fn submit(&self, event: SurfaceEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}
