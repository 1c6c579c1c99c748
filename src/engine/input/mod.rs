//! ### English
//! Input translation: platform events to embedded-surface mouse, wheel and key events.
//!
//! ### 中文
//! 输入转换：将平台事件转换为嵌入 surface 的鼠标、滚轮与按键事件。
pub mod keyboard;
mod modifiers;
mod platform;
mod scroll;
mod translator;
mod utf8;

pub use modifiers::EventFlags;
pub use platform::{
    PLATFORM_BUTTON_LEFT, PLATFORM_BUTTON_MIDDLE, PLATFORM_BUTTON_RIGHT, PlatformEvent,
    TEXT_INPUT_CAPACITY,
};
pub use scroll::{ScrollAccumulator, ScrollStep};
pub use translator::{InputRouting, InputTranslator};
pub use utf8::{Utf8Chars, decode_utf8};
