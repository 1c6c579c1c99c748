//! ### English
//! Dirty-rect geometry and the byte addressing of a sub-region inside a full BGRA buffer.
//!
//! ### 中文
//! 脏矩形几何，以及子区域在完整 BGRA 缓冲区中的字节寻址。

/// ### English
/// Bytes per BGRA8 texel.
///
/// ### 中文
/// 每个 BGRA8 像素的字节数。
pub const BYTES_PER_PIXEL: usize = 4;

/// ### English
/// Integer rectangle in buffer pixels; always clamped into the owning frame.
///
/// ### 中文
/// 以缓冲区像素为单位的整数矩形；始终被裁剪到所属帧之内。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// ### English
    /// Rectangle covering a whole `width × height` frame.
    ///
    /// ### 中文
    /// 覆盖整个 `width × height` 帧的矩形。
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// ### English
    /// Clamps a signed rectangle reported by the browser into `[0, width) × [0, height)`.
    ///
    /// Fully outside rectangles collapse to an empty rectangle at the clamped origin.
    ///
    /// #### Parameters
    /// - `x`, `y`, `w`, `h`: Raw rectangle from the paint callback (may be negative or oversized).
    /// - `width`, `height`: Frame dimensions.
    ///
    /// ### 中文
    /// 将浏览器报告的有符号矩形裁剪到 `[0, width) × [0, height)`。
    ///
    /// 完全在外部的矩形会收缩为裁剪后原点处的空矩形。
    ///
    /// #### 参数
    /// - `x`、`y`、`w`、`h`：paint 回调给出的原始矩形（可能为负或越界）。
    /// - `width`、`height`：帧尺寸。
    pub fn clamped(x: i32, y: i32, w: i32, h: i32, width: u32, height: u32) -> Self {
        let left = i64::from(x).clamp(0, i64::from(width));
        let top = i64::from(y).clamp(0, i64::from(height));
        let right = (i64::from(x) + i64::from(w.max(0))).clamp(left, i64::from(width));
        let bottom = (i64::from(y) + i64::from(h.max(0))).clamp(top, i64::from(height));
        Self::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// ### English
    /// Returns whether this rectangle covers the whole `width × height` frame.
    ///
    /// ### 中文
    /// 返回该矩形是否覆盖整个 `width × height` 帧。
    #[inline]
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width >= width && self.height >= height
    }

    /// ### English
    /// Returns whether this rectangle lies inside a `width × height` frame.
    ///
    /// ### 中文
    /// 返回该矩形是否位于 `width × height` 帧之内。
    #[inline]
    pub fn fits(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// ### English
/// Where a dirty region lives inside the full, tightly packed source buffer.
///
/// The region is never repacked: `offset` points at its first texel and consecutive rows are
/// `row_pitch` bytes apart (the full frame's pitch, not the region's width).
///
/// ### 中文
/// 脏区域在完整、紧密排列的源缓冲区中的位置。
///
/// 区域不会被重新打包：`offset` 指向其第一个像素，相邻行间距为 `row_pitch` 字节
/// （即整帧的行距，而非区域宽度）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadRegion {
    pub rect: DirtyRect,
    /// ### English
    /// Byte offset of the region's first texel: `y * row_pitch + x * 4`.
    ///
    /// ### 中文
    /// 区域首个像素的字节偏移：`y * row_pitch + x * 4`。
    pub offset: usize,
    /// ### English
    /// Source row pitch in bytes: `frame_width * 4`.
    ///
    /// ### 中文
    /// 源行距（字节）：`frame_width * 4`。
    pub row_pitch: usize,
    /// ### English
    /// Source row length in texels (what GL calls `UNPACK_ROW_LENGTH`).
    ///
    /// ### 中文
    /// 源行长度（像素数；对应 GL 的 `UNPACK_ROW_LENGTH`）。
    pub row_length: u32,
}

impl UploadRegion {
    pub fn new(rect: DirtyRect, frame_width: u32) -> Self {
        let row_pitch = frame_width as usize * BYTES_PER_PIXEL;
        Self {
            rect,
            offset: rect.y as usize * row_pitch + rect.x as usize * BYTES_PER_PIXEL,
            row_pitch,
            row_length: frame_width,
        }
    }

    /// ### English
    /// Number of source bytes the region touches, starting at `offset`.
    ///
    /// ### 中文
    /// 从 `offset` 开始该区域触及的源字节数。
    pub fn span_bytes(&self) -> usize {
        if self.rect.is_empty() {
            return 0;
        }
        (self.rect.height as usize - 1) * self.row_pitch
            + self.rect.width as usize * BYTES_PER_PIXEL
    }
}
