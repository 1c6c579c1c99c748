//! ### English
//! Browser cursor kinds mapped onto the small cursor set a host UI can show.
//!
//! ### 中文
//! 将浏览器光标类型映射到宿主 UI 可显示的小型光标集合。

/// ### English
/// Host cursor shapes.
///
/// ### 中文
/// 宿主光标形状。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum CursorShape {
    #[default]
    Arrow = 0,
    TextInput = 1,
    ResizeAll = 2,
    ResizeNS = 3,
    ResizeEW = 4,
    ResizeNESW = 5,
    ResizeNWSE = 6,
    Hand = 7,
    NotAllowed = 8,
}

impl CursorShape {
    /// ### English
    /// Maps a browser cursor type id. Unknown ids fall back to `Arrow`.
    ///
    /// ### 中文
    /// 映射浏览器光标类型 id；未知 id 回退为 `Arrow`。
    pub fn from_platform(kind: u32) -> Self {
        match kind {
            2 => Self::Hand,
            3 | 30 => Self::TextInput,
            // east, west, east-west, column
            6 | 13 | 15 | 18 => Self::ResizeEW,
            // north, south, north-south, row
            7 | 10 | 14 | 19 => Self::ResizeNS,
            8 | 12 | 16 => Self::ResizeNESW,
            9 | 11 | 17 => Self::ResizeNWSE,
            29 => Self::ResizeAll,
            35 | 38 => Self::NotAllowed,
            _ => Self::Arrow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_map() {
        assert_eq!(CursorShape::from_platform(0), CursorShape::Arrow);
        assert_eq!(CursorShape::from_platform(2), CursorShape::Hand);
        assert_eq!(CursorShape::from_platform(3), CursorShape::TextInput);
        assert_eq!(CursorShape::from_platform(15), CursorShape::ResizeEW);
        assert_eq!(CursorShape::from_platform(14), CursorShape::ResizeNS);
        assert_eq!(CursorShape::from_platform(16), CursorShape::ResizeNESW);
        assert_eq!(CursorShape::from_platform(17), CursorShape::ResizeNWSE);
        assert_eq!(CursorShape::from_platform(29), CursorShape::ResizeAll);
        assert_eq!(CursorShape::from_platform(38), CursorShape::NotAllowed);
    }

    #[test]
    fn unknown_kinds_fall_back_to_arrow() {
        for kind in [1, 4, 5, 20, 37, 39, 1000, u32::MAX] {
            assert_eq!(CursorShape::from_platform(kind), CursorShape::Arrow);
        }
    }
}
