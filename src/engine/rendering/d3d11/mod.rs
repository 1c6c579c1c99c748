//! ### English
//! Direct3D 11 texture streamer.
//!
//! Full recreate creates a texture with initial subresource data plus a shader resource view;
//! partial update is a box-restricted `UpdateSubresource` reading from the dirty region's first
//! texel at the full buffer's row pitch.
//!
//! ### 中文
//! Direct3D 11 纹理 streamer。
//!
//! 完整重建：以初始子资源数据创建纹理并创建 shader resource view；
//! 局部更新：以 box 限定的 `UpdateSubresource`，从脏区域首像素开始按整帧行距读取。
#[cfg(windows)]
mod native;

#[cfg(windows)]
pub use native::D3D11Device;

use dpi::PhysicalSize;

use super::draw_list::TextureId;
use super::streamer::TextureStreamer;
use crate::engine::error::SurfaceError;
use crate::engine::frame::{DirtyRect, FrameBuffer};

/// ### English
/// Device operations the streamer needs, keyed by the shader resource view id.
///
/// Textures are `B8G8R8A8_UNORM` (or `_SRGB`), default usage, bound as shader resources.
///
/// ### 中文
/// streamer 所需的设备操作，以 shader resource view id 作为键。
///
/// 纹理格式为 `B8G8R8A8_UNORM`（或 `_SRGB`），默认用法，绑定为 shader resource。
pub trait D3D11TextureApi {
    /// ### English
    /// Creates a `width × height` texture initialized from `pixels` and its view.
    ///
    /// ### 中文
    /// 以 `pixels` 初始化创建 `width × height` 纹理及其视图。
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        row_pitch: u32,
        srgb: bool,
    ) -> Result<TextureId, SurfaceError>;

    /// ### English
    /// Copies `rect` into `texture`. `source` starts at the rect's first texel; rows are
    /// `row_pitch` bytes apart.
    ///
    /// ### 中文
    /// 将 `rect` 拷贝到 `texture`。`source` 从矩形首像素开始，行间距为 `row_pitch` 字节。
    fn update_region(
        &self,
        texture: TextureId,
        rect: DirtyRect,
        source: &[u8],
        row_pitch: u32,
    ) -> Result<(), SurfaceError>;

    fn release_texture(&self, texture: TextureId);

    /// ### English
    /// Whether the device has been removed or reset.
    ///
    /// ### 中文
    /// 设备是否已被移除或重置。
    fn device_removed(&self) -> bool;
}

/// ### English
/// Direct3D 11 backend of the compositing bridge.
///
/// ### 中文
/// 合成桥的 Direct3D 11 后端。
pub struct D3D11Streamer {
    device: Box<dyn D3D11TextureApi>,
    texture: Option<TextureId>,
    size: PhysicalSize<u32>,
    srgb: bool,
}

impl D3D11Streamer {
    pub fn new(device: Box<dyn D3D11TextureApi>, srgb: bool) -> Self {
        Self {
            device,
            texture: None,
            size: PhysicalSize::new(0, 0),
            srgb,
        }
    }
}

impl TextureStreamer for D3D11Streamer {
    fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    fn texture_size(&self) -> Option<PhysicalSize<u32>> {
        self.texture.map(|_| self.size)
    }

    fn apply_full(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError> {
        let texture = self.device.create_texture(
            frame.width(),
            frame.height(),
            frame.pixels(),
            frame.row_pitch() as u32,
            self.srgb,
        )?;
        if let Some(previous) = self.texture.replace(texture) {
            self.device.release_texture(previous);
        }
        self.size = frame.size();
        Ok(())
    }

    fn apply_partial(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError> {
        let Some(texture) = self.texture else {
            return Err(SurfaceError::TextureUpdate("no texture to update".to_string()));
        };

        let region = frame.upload_region();
        let source = frame
            .pixels()
            .get(region.offset..region.offset + region.span_bytes())
            .ok_or_else(|| {
                SurfaceError::TextureUpdate(format!("dirty rect {:?} outside buffer", region.rect))
            })?;
        self.device
            .update_region(texture, region.rect, source, region.row_pitch as u32)?;

        if self.device.device_removed() {
            return Err(SurfaceError::DeviceLost);
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(texture) = self.texture.take() {
            self.device.release_texture(texture);
        }
        self.size = PhysicalSize::new(0, 0);
    }
}

impl Drop for D3D11Streamer {
    fn drop(&mut self) {
        self.release();
    }
}
