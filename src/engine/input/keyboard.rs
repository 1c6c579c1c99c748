//! ### English
//! Platform (SDL) key codes to Windows virtual-key codes and modifier flags.
//!
//! ### 中文
//! 平台（SDL）键码到 Windows 虚拟键码与修饰键标志的映射。
use super::modifiers::EventFlags;

/// ### English
/// Key codes for keys without a printable character carry this bit (scancode | mask).
///
/// ### 中文
/// 无可打印字符的按键键码带有该位（scancode | mask）。
const SCANCODE_MASK: u32 = 1 << 30;

pub const KEY_BACKSPACE: u32 = 0x08;
pub const KEY_TAB: u32 = 0x09;
pub const KEY_RETURN: u32 = 0x0D;
pub const KEY_ESCAPE: u32 = 0x1B;
pub const KEY_DELETE: u32 = 0x7F;
pub const KEY_CAPS_LOCK: u32 = SCANCODE_MASK | 57;
pub const KEY_NUM_LOCK: u32 = SCANCODE_MASK | 83;
pub const KEY_KP_ENTER: u32 = SCANCODE_MASK | 88;
pub const KEY_LCTRL: u32 = SCANCODE_MASK | 224;
pub const KEY_LSHIFT: u32 = SCANCODE_MASK | 225;
pub const KEY_LALT: u32 = SCANCODE_MASK | 226;
pub const KEY_LGUI: u32 = SCANCODE_MASK | 227;
pub const KEY_RCTRL: u32 = SCANCODE_MASK | 228;
pub const KEY_RSHIFT: u32 = SCANCODE_MASK | 229;
pub const KEY_RALT: u32 = SCANCODE_MASK | 230;
pub const KEY_RGUI: u32 = SCANCODE_MASK | 231;

/// ### English
/// Modifier held while `keycode` is down.
///
/// ### 中文
/// `keycode` 按下期间保持的修饰键。
pub fn held_modifier(keycode: u32) -> Option<EventFlags> {
    match keycode {
        KEY_LSHIFT | KEY_RSHIFT => Some(EventFlags::SHIFT),
        KEY_LCTRL | KEY_RCTRL => Some(EventFlags::CONTROL),
        KEY_LALT | KEY_RALT => Some(EventFlags::ALT),
        KEY_LGUI | KEY_RGUI => Some(EventFlags::COMMAND),
        _ => None,
    }
}

/// ### English
/// Lock state flipped by each press of `keycode`.
///
/// ### 中文
/// 每次按下 `keycode` 时翻转的锁定状态。
pub fn toggled_modifier(keycode: u32) -> Option<EventFlags> {
    match keycode {
        KEY_CAPS_LOCK => Some(EventFlags::CAPS_LOCK),
        KEY_NUM_LOCK => Some(EventFlags::NUM_LOCK),
        _ => None,
    }
}

/// ### English
/// Character synthesized for control keys that never arrive as text input.
///
/// ### 中文
/// 为不会以文本输入形式到达的控制键合成的字符。
pub fn control_char(keycode: u32) -> Option<char> {
    match keycode {
        KEY_RETURN | KEY_KP_ENTER => Some('\r'),
        KEY_TAB => Some('\t'),
        KEY_BACKSPACE => Some('\u{8}'),
        _ => None,
    }
}

/// ### English
/// Windows virtual-key code for `keycode`, or `None` for keys the surface does not know.
///
/// ### 中文
/// `keycode` 对应的 Windows 虚拟键码；surface 不识别的按键返回 `None`。
pub fn windows_key_code(keycode: u32) -> Option<u32> {
    let vk = match keycode {
        KEY_BACKSPACE => 0x08,
        KEY_TAB => 0x09,
        KEY_RETURN | KEY_KP_ENTER => 0x0D,
        KEY_ESCAPE => 0x1B,
        0x20 => 0x20,
        KEY_DELETE => 0x2E,
        // '0'..='9'
        0x30..=0x39 => keycode,
        // 'a'..='z' map to 'A'..='Z'
        0x61..=0x7A => keycode - 0x20,
        0x27 => 0xDE,
        0x2C => 0xBC,
        0x2D => 0xBD,
        0x2E => 0xBE,
        0x2F => 0xBF,
        0x3B => 0xBA,
        0x3D => 0xBB,
        0x5B => 0xDB,
        0x5C => 0xDC,
        0x5D => 0xDD,
        0x60 => 0xC0,
        _ if keycode & SCANCODE_MASK != 0 => return scancode_key(keycode & !SCANCODE_MASK),
        _ => return None,
    };
    Some(vk)
}

fn scancode_key(scancode: u32) -> Option<u32> {
    let vk = match scancode {
        57 => 0x14,
        // F1..=F12
        58..=69 => 0x70 + (scancode - 58),
        70 => 0x2C,
        71 => 0x91,
        72 => 0x13,
        73 => 0x2D,
        74 => 0x24,
        75 => 0x21,
        77 => 0x23,
        78 => 0x22,
        79 => 0x27,
        80 => 0x25,
        81 => 0x28,
        82 => 0x26,
        83 => 0x90,
        84 => 0x6F,
        85 => 0x6A,
        86 => 0x6D,
        87 => 0x6B,
        // keypad 1..=9
        89..=97 => 0x61 + (scancode - 89),
        98 => 0x60,
        99 => 0x6E,
        101 => 0x5D,
        224 | 228 => 0x11,
        225 | 229 => 0x10,
        226 | 230 => 0x12,
        227 => 0x5B,
        231 => 0x5C,
        _ => return None,
    };
    Some(vk)
}
