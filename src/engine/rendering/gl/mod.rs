//! ### English
//! OpenGL texture streamer.
//!
//! Uploads read strided data straight out of the full paint buffer: `UNPACK_ROW_LENGTH` is set to
//! the frame width and, for partial updates, `UNPACK_SKIP_PIXELS/ROWS` to the dirty origin, so the
//! dirty region is never repacked.
//!
//! ### 中文
//! OpenGL 纹理 streamer。
//!
//! 上传时直接从完整 paint 缓冲区按行距读取：`UNPACK_ROW_LENGTH` 设为帧宽；局部更新时
//! `UNPACK_SKIP_PIXELS/ROWS` 设为脏矩形原点，因此脏区域无需重新打包。
mod backends;
mod context;

pub use backends::GleamTextureApi;
pub use context::HostGlContext;

use dpi::PhysicalSize;

use super::draw_list::TextureId;
use super::streamer::TextureStreamer;
use crate::engine::error::SurfaceError;
use crate::engine::frame::FrameBuffer;

/// ### English
/// The handful of GL texture entry points the streamer needs.
///
/// All calls target `TEXTURE_2D` with `BGRA` / `UNSIGNED_BYTE` source data, level 0.
///
/// ### 中文
/// streamer 所需的少量 GL 纹理入口。
///
/// 所有调用均针对 `TEXTURE_2D`、源数据为 `BGRA` / `UNSIGNED_BYTE`、mip level 0。
pub trait GlTextureApi {
    fn create_texture(&self) -> Result<u32, String>;
    fn delete_texture(&self, texture: u32);
    fn bind_texture(&self, texture: u32);
    fn pixel_store(&self, pname: u32, value: i32);
    fn tex_parameter(&self, pname: u32, value: i32);
    fn tex_image_2d(&self, internal_format: i32, width: i32, height: i32, pixels: &[u8]);
    fn tex_sub_image_2d(&self, x: i32, y: i32, width: i32, height: i32, pixels: &[u8]);
    fn get_error(&self) -> u32;
}

/// ### English
/// Upper bound when draining stale GL errors (a lost context may report errors forever).
///
/// ### 中文
/// 清空遗留 GL 错误时的上限（上下文丢失时可能持续报告错误）。
const MAX_STALE_ERRORS: usize = 8;

/// ### English
/// OpenGL backend of the compositing bridge.
///
/// ### 中文
/// 合成桥的 OpenGL 后端。
pub struct GlStreamer {
    gl: Box<dyn GlTextureApi>,
    texture: Option<u32>,
    size: PhysicalSize<u32>,
    internal_format: i32,
}

impl GlStreamer {
    /// ### English
    /// Creates a streamer over `gl`.
    ///
    /// #### Parameters
    /// - `gl`: Texture API bound to the host's current context.
    /// - `srgb`: Use `SRGB8_ALPHA8` instead of `RGBA8` (caller checks device support).
    ///
    /// ### 中文
    /// 基于 `gl` 创建 streamer。
    ///
    /// #### 参数
    /// - `gl`：绑定到宿主当前上下文的纹理 API。
    /// - `srgb`：使用 `SRGB8_ALPHA8` 代替 `RGBA8`（由调用方检查设备支持）。
    pub fn new(gl: Box<dyn GlTextureApi>, srgb: bool) -> Self {
        let internal_format = if srgb {
            glow::SRGB8_ALPHA8 as i32
        } else {
            glow::RGBA8 as i32
        };
        Self {
            gl,
            texture: None,
            size: PhysicalSize::new(0, 0),
            internal_format,
        }
    }

    fn drain_stale_errors(&self) {
        for _ in 0..MAX_STALE_ERRORS {
            if self.gl.get_error() == glow::NO_ERROR {
                break;
            }
        }
    }

    fn reset_unpack(&self) {
        self.gl.pixel_store(glow::UNPACK_ROW_LENGTH, 0);
        self.gl.pixel_store(glow::UNPACK_SKIP_PIXELS, 0);
        self.gl.pixel_store(glow::UNPACK_SKIP_ROWS, 0);
    }
}

impl TextureStreamer for GlStreamer {
    fn texture(&self) -> Option<TextureId> {
        self.texture.map(|name| TextureId(u64::from(name)))
    }

    fn texture_size(&self) -> Option<PhysicalSize<u32>> {
        self.texture.map(|_| self.size)
    }

    fn apply_full(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError> {
        self.drain_stale_errors();

        let texture = self
            .gl
            .create_texture()
            .map_err(SurfaceError::TextureCreation)?;
        self.gl.bind_texture(texture);
        self.gl
            .tex_parameter(glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
        self.gl
            .tex_parameter(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
        self.gl
            .tex_parameter(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        self.gl
            .tex_parameter(glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);

        self.gl.pixel_store(glow::UNPACK_ALIGNMENT, 4);
        self.gl
            .pixel_store(glow::UNPACK_ROW_LENGTH, frame.width() as i32);
        self.gl.pixel_store(glow::UNPACK_SKIP_PIXELS, 0);
        self.gl.pixel_store(glow::UNPACK_SKIP_ROWS, 0);
        self.gl.tex_image_2d(
            self.internal_format,
            frame.width() as i32,
            frame.height() as i32,
            frame.pixels(),
        );
        self.reset_unpack();

        let error = self.gl.get_error();
        if error != glow::NO_ERROR {
            self.gl.delete_texture(texture);
            if let Some(previous) = self.texture {
                self.gl.bind_texture(previous);
            }
            return Err(SurfaceError::TextureCreation(format!(
                "glTexImage2D {}x{} failed: 0x{error:04X}",
                frame.width(),
                frame.height()
            )));
        }

        if let Some(previous) = self.texture.replace(texture) {
            self.gl.delete_texture(previous);
        }
        self.size = frame.size();
        Ok(())
    }

    fn apply_partial(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError> {
        let Some(texture) = self.texture else {
            return Err(SurfaceError::TextureUpdate("no texture to update".to_string()));
        };
        self.drain_stale_errors();

        let region = frame.upload_region();
        let rect = region.rect;
        self.gl.bind_texture(texture);
        self.gl
            .pixel_store(glow::UNPACK_ROW_LENGTH, region.row_length as i32);
        self.gl.pixel_store(glow::UNPACK_SKIP_PIXELS, rect.x as i32);
        self.gl.pixel_store(glow::UNPACK_SKIP_ROWS, rect.y as i32);
        self.gl.tex_sub_image_2d(
            rect.x as i32,
            rect.y as i32,
            rect.width as i32,
            rect.height as i32,
            frame.pixels(),
        );
        self.reset_unpack();

        match self.gl.get_error() {
            glow::NO_ERROR => Ok(()),
            error => Err(SurfaceError::TextureUpdate(format!(
                "glTexSubImage2D {rect:?} failed: 0x{error:04X}"
            ))),
        }
    }

    fn release(&mut self) {
        if let Some(texture) = self.texture.take() {
            self.gl.delete_texture(texture);
        }
        self.size = PhysicalSize::new(0, 0);
    }
}

impl Drop for GlStreamer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frame::{DirtyRect, PaintKind};
    use crate::engine::rendering::software::SoftwareGl;

    fn solid(size: u32, dirty: DirtyRect, bgra: [u8; 4]) -> FrameBuffer {
        let pixels: Vec<u8> = bgra
            .iter()
            .copied()
            .cycle()
            .take((size * size * 4) as usize)
            .collect();
        FrameBuffer::copy_from(
            PaintKind::FullSurface,
            dirty,
            &pixels,
            PhysicalSize::new(size, size),
        )
        .unwrap()
    }

    #[test]
    fn partial_update_reads_strided_region() {
        let device = SoftwareGl::new();
        let mut streamer = GlStreamer::new(Box::new(device.clone()), false);

        streamer
            .apply_full(&solid(16, DirtyRect::full(16, 16), [0, 0, 255, 255]))
            .unwrap();
        let mut pixels = vec![0u8; 16 * 16 * 4];
        for y in 4..6 {
            for x in 3..7 {
                let at = (y * 16 + x) * 4;
                pixels[at..at + 4].copy_from_slice(&[255, 0, 0, 255]);
            }
        }
        let frame = FrameBuffer::copy_from(
            PaintKind::FullSurface,
            DirtyRect::new(3, 4, 4, 2),
            &pixels,
            PhysicalSize::new(16, 16),
        )
        .unwrap();
        streamer.apply_partial(&frame).unwrap();

        let TextureId(name) = streamer.texture().unwrap();
        assert_eq!(device.pixel(name as u32, 3, 4), [255, 0, 0, 255]);
        assert_eq!(device.pixel(name as u32, 6, 5), [255, 0, 0, 255]);
        assert_eq!(device.pixel(name as u32, 7, 5), [0, 0, 255, 255]);
        assert_eq!(device.pixel(name as u32, 3, 6), [0, 0, 255, 255]);
        assert_eq!(device.unpack_state(), (0, 0, 0));
    }

    #[test]
    fn failed_creation_keeps_previous_texture() {
        let device = SoftwareGl::new();
        let mut streamer = GlStreamer::new(Box::new(device.clone()), false);
        streamer
            .apply_full(&solid(8, DirtyRect::full(8, 8), [1, 2, 3, 4]))
            .unwrap();
        let before = streamer.texture();

        device.fail_next_image();
        let err = streamer
            .apply_full(&solid(4, DirtyRect::full(4, 4), [9, 9, 9, 9]))
            .unwrap_err();
        assert!(matches!(err, SurfaceError::TextureCreation(_)));
        assert_eq!(streamer.texture(), before);
        assert_eq!(streamer.texture_size(), Some(PhysicalSize::new(8, 8)));
        assert_eq!(device.live_textures(), 1);
    }

    #[test]
    fn srgb_selects_srgb_internal_format() {
        let device = SoftwareGl::new();
        let mut streamer = GlStreamer::new(Box::new(device.clone()), true);
        streamer
            .apply_full(&solid(2, DirtyRect::full(2, 2), [0; 4]))
            .unwrap();
        let TextureId(name) = streamer.texture().unwrap();
        assert_eq!(
            device.internal_format(name as u32),
            Some(glow::SRGB8_ALPHA8 as i32)
        );
    }

    #[test]
    fn release_deletes_texture_once() {
        let device = SoftwareGl::new();
        let mut streamer = GlStreamer::new(Box::new(device.clone()), false);
        streamer
            .apply_full(&solid(2, DirtyRect::full(2, 2), [0; 4]))
            .unwrap();
        streamer.release();
        streamer.release();
        assert_eq!(device.live_textures(), 0);
        assert_eq!(device.deleted_count(), 1);
        assert!(streamer.texture().is_none());
    }
}
