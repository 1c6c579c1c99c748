//! ### English
//! Modifier and mouse-button state carried by every forwarded event.
//!
//! ### 中文
//! 每个转发事件都携带的修饰键与鼠标按键状态。
use bitflags::bitflags;

use crate::engine::surface::MouseButton;

bitflags! {
    /// ### English
    /// Embedded-surface event flags (bit values match the browser's input model).
    ///
    /// ### 中文
    /// 嵌入 surface 的事件标志（位值与浏览器输入模型一致）。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        const CAPS_LOCK           = 1 << 0;
        const SHIFT               = 1 << 1;
        const CONTROL             = 1 << 2;
        const ALT                 = 1 << 3;
        const LEFT_MOUSE_BUTTON   = 1 << 4;
        const MIDDLE_MOUSE_BUTTON = 1 << 5;
        const RIGHT_MOUSE_BUTTON  = 1 << 6;
        const COMMAND             = 1 << 7;
        const NUM_LOCK            = 1 << 8;
    }
}

impl EventFlags {
    /// ### English
    /// Flag held while `button` is down.
    ///
    /// ### 中文
    /// `button` 按下期间保持的标志。
    pub fn for_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT_MOUSE_BUTTON,
            MouseButton::Middle => Self::MIDDLE_MOUSE_BUTTON,
            MouseButton::Right => Self::RIGHT_MOUSE_BUTTON,
        }
    }

    /// ### English
    /// Any mouse button currently held.
    ///
    /// ### 中文
    /// 当前是否有任意鼠标按键按下。
    pub fn any_button(self) -> bool {
        self.intersects(
            Self::LEFT_MOUSE_BUTTON | Self::MIDDLE_MOUSE_BUTTON | Self::RIGHT_MOUSE_BUTTON,
        )
    }
}
