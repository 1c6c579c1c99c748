//! ### English
//! The host's per-frame draw primitive, reduced to what the surface needs.
//!
//! ### 中文
//! 宿主的每帧绘制原语，仅保留 surface 所需的部分。
use super::cursor::CursorShape;

/// ### English
/// Backend texture reference placed into the draw list.
///
/// OpenGL: the texture name. Direct3D 11: the shader resource view pointer.
///
/// ### 中文
/// 放入绘制列表的后端纹理引用。
///
/// OpenGL：纹理名。Direct3D 11：shader resource view 指针。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// ### English
/// Screen-space rectangle the surface occupies this frame.
///
/// ### 中文
/// surface 本帧占据的屏幕空间矩形。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl BoundingBox {
    pub fn from_origin_size(origin: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            min: origin,
            max: [origin[0] + size[0], origin[1] + size[1]],
        }
    }
}

/// ### English
/// Frame draw list accepting a textured quad and a cursor request.
///
/// ### 中文
/// 接受纹理四边形与光标请求的帧绘制列表。
pub trait FrameDrawList {
    /// ### English
    /// Draws `texture` stretched over `min..max` (UV 0..1).
    ///
    /// ### 中文
    /// 将 `texture` 拉伸绘制到 `min..max`（UV 0..1）。
    fn add_image(&mut self, texture: TextureId, min: [f32; 2], max: [f32; 2]);

    fn set_mouse_cursor(&mut self, cursor: CursorShape);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// ### English
    /// Draw list that records what was emitted.
    ///
    /// ### 中文
    /// 记录输出内容的绘制列表。
    #[derive(Default)]
    pub(crate) struct RecordingDrawList {
        pub(crate) images: Vec<(TextureId, [f32; 2], [f32; 2])>,
        pub(crate) cursors: Vec<CursorShape>,
    }

    impl FrameDrawList for RecordingDrawList {
        fn add_image(&mut self, texture: TextureId, min: [f32; 2], max: [f32; 2]) {
            self.images.push((texture, min, max));
        }

        fn set_mouse_cursor(&mut self, cursor: CursorShape) {
            self.cursors.push(cursor);
        }
    }
}
