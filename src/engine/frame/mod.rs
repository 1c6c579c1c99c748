//! ### English
//! Ownership-carrying paint results handed from the browser paint thread to the render thread.
//!
//! A `FrameBuffer` owns a private copy of the pixels (the browser only guarantees its buffer for
//! the duration of the paint callback). It is move-only: it is moved into the paint queue, moved
//! out by the single consumer, and its storage is released exactly once when it is dropped.
//!
//! ### 中文
//! 从浏览器 paint 线程交给渲染线程、携带所有权的 paint 结果。
//!
//! `FrameBuffer` 持有像素的私有拷贝（浏览器只保证其缓冲区在 paint 回调期间有效）。
//! 它只能移动：移入 paint 队列，由唯一消费者移出，并在 drop 时恰好释放一次存储。
mod rect;

pub use rect::{BYTES_PER_PIXEL, DirtyRect, UploadRegion};

use dpi::PhysicalSize;

use crate::engine::error::SurfaceError;

/// ### English
/// Which browser surface produced the paint.
///
/// ### 中文
/// 产生该 paint 的浏览器表面类型。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintKind {
    /// ### English
    /// Primary page content; the only kind streamed into the texture.
    ///
    /// ### 中文
    /// 主页面内容；唯一会被上传到纹理的类型。
    FullSurface,
    /// ### English
    /// Transient overlay content (popups); drained and released without a texture update.
    ///
    /// ### 中文
    /// 临时覆盖内容（弹出层）；会被 drain 并释放，但不更新纹理。
    Overlay,
}

impl PaintKind {
    /// ### English
    /// Maps the C ABI value (`0` = view, `1` = popup).
    ///
    /// ### 中文
    /// 映射 C ABI 值（`0` = view，`1` = popup）。
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::FullSurface),
            1 => Some(Self::Overlay),
            _ => None,
        }
    }
}

/// ### English
/// One paint result: kind, dirty rect, full dimensions and exclusively-owned BGRA8 pixels.
///
/// `pixels` is tightly packed (`row pitch = width * 4`) and always `width * height * 4` bytes.
///
/// ### 中文
/// 单次 paint 结果：类型、脏矩形、完整尺寸以及独占的 BGRA8 像素。
///
/// `pixels` 紧密排列（`行距 = width * 4`），长度恒为 `width * height * 4` 字节。
#[derive(Debug)]
pub struct FrameBuffer {
    kind: PaintKind,
    dirty_rect: DirtyRect,
    size: PhysicalSize<u32>,
    pixels: Box<[u8]>,
}

impl FrameBuffer {
    /// ### English
    /// Copies a browser-supplied buffer into a new `FrameBuffer`.
    ///
    /// `dirty_rect` is clamped into the frame. Only the first `width * height * 4` bytes of
    /// `source` are copied.
    ///
    /// #### Parameters
    /// - `kind`: Surface kind that painted.
    /// - `dirty_rect`: Changed region (will be clamped).
    /// - `source`: Browser pixel buffer (BGRA8, tightly packed).
    /// - `size`: Full buffer dimensions.
    ///
    /// ### 中文
    /// 将浏览器提供的缓冲区拷贝到新的 `FrameBuffer`。
    ///
    /// `dirty_rect` 会被裁剪到帧内；只拷贝 `source` 的前 `width * height * 4` 字节。
    ///
    /// #### 参数
    /// - `kind`：产生 paint 的表面类型。
    /// - `dirty_rect`：变化区域（会被裁剪）。
    /// - `source`：浏览器像素缓冲区（BGRA8，紧密排列）。
    /// - `size`：完整缓冲区尺寸。
    pub fn copy_from(
        kind: PaintKind,
        dirty_rect: DirtyRect,
        source: &[u8],
        size: PhysicalSize<u32>,
    ) -> Result<Self, SurfaceError> {
        let len = byte_len(size)?;
        if source.len() < len {
            return Err(SurfaceError::InvalidFrame(format!(
                "buffer holds {} bytes, {}x{} needs {len}",
                source.len(),
                size.width,
                size.height
            )));
        }

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| SurfaceError::Allocation { bytes: len })?;
        pixels.extend_from_slice(&source[..len]);

        Ok(Self {
            kind,
            dirty_rect: clamp_rect(dirty_rect, size),
            size,
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// ### English
    /// Copies a raw browser buffer (paint callback pointer) into a new `FrameBuffer`.
    ///
    /// # Safety
    /// `source` must be valid for reads of `width * height * 4` bytes for the duration of the call.
    ///
    /// ### 中文
    /// 将浏览器原始缓冲区（paint 回调指针）拷贝到新的 `FrameBuffer`。
    ///
    /// # Safety
    /// 在本次调用期间，`source` 必须可读 `width * height * 4` 字节。
    pub unsafe fn copy_from_raw(
        kind: PaintKind,
        dirty_rect: DirtyRect,
        source: *const u8,
        size: PhysicalSize<u32>,
    ) -> Result<Self, SurfaceError> {
        if source.is_null() {
            return Err(SurfaceError::InvalidFrame("null pixel buffer".to_string()));
        }
        let len = byte_len(size)?;
        let source = unsafe { std::slice::from_raw_parts(source, len) };
        Self::copy_from(kind, dirty_rect, source, size)
    }

    #[inline]
    pub fn kind(&self) -> PaintKind {
        self.kind
    }

    #[inline]
    pub fn dirty_rect(&self) -> DirtyRect {
        self.dirty_rect
    }

    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// ### English
    /// Source row pitch in bytes (`width * 4`).
    ///
    /// ### 中文
    /// 源行距（字节，`width * 4`）。
    #[inline]
    pub fn row_pitch(&self) -> usize {
        self.size.width as usize * BYTES_PER_PIXEL
    }

    /// ### English
    /// Addressing of the dirty rect inside `pixels`.
    ///
    /// ### 中文
    /// 脏矩形在 `pixels` 中的寻址信息。
    #[inline]
    pub fn upload_region(&self) -> UploadRegion {
        UploadRegion::new(self.dirty_rect, self.size.width)
    }

    /// ### English
    /// Returns whether the dirty rect covers the whole frame.
    ///
    /// ### 中文
    /// 返回脏矩形是否覆盖整帧。
    #[inline]
    pub fn is_full_cover(&self) -> bool {
        self.dirty_rect.covers(self.size.width, self.size.height)
    }

    /// ### English
    /// Releases the pixel storage. Consuming `self` makes a second release unrepresentable.
    ///
    /// ### 中文
    /// 释放像素存储。由于消费 `self`，第二次释放无法被表达。
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

fn byte_len(size: PhysicalSize<u32>) -> Result<usize, SurfaceError> {
    if size.width == 0 || size.height == 0 {
        return Err(SurfaceError::InvalidFrame(format!(
            "empty frame {}x{}",
            size.width, size.height
        )));
    }
    (size.width as usize)
        .checked_mul(size.height as usize)
        .and_then(|texels| texels.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            SurfaceError::InvalidFrame(format!("frame {}x{} overflows", size.width, size.height))
        })
}

fn clamp_rect(rect: DirtyRect, size: PhysicalSize<u32>) -> DirtyRect {
    if rect.fits(size.width, size.height) {
        return rect;
    }
    DirtyRect::clamped(
        rect.x.min(i32::MAX as u32) as i32,
        rect.y.min(i32::MAX as u32) as i32,
        rect.width.min(i32::MAX as u32) as i32,
        rect.height.min(i32::MAX as u32) as i32,
        size.width,
        size.height,
    )
}
