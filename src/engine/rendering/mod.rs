//! ### English
//! Compositing bridge: drains paint results on the render thread and streams them into a
//! backend texture (Direct3D 11 or OpenGL) that the host draws each frame.
//!
//! ### 中文
//! 合成桥：在渲染线程 drain paint 结果，并将其流式上传到后端纹理（Direct3D 11 或 OpenGL），
//! 由宿主每帧绘制。
mod cursor;
pub mod d3d11;
pub(crate) mod draw_list;
pub mod gl;
mod host;
#[cfg(test)]
pub(crate) mod software;
mod streamer;

pub use cursor::CursorShape;
pub use d3d11::{D3D11Streamer, D3D11TextureApi};
pub use draw_list::{BoundingBox, FrameDrawList, TextureId};
pub use gl::{GlStreamer, GlTextureApi};
pub use host::{RenderSurfaceHost, SurfaceStats};
pub use streamer::{BackendStreamer, TextureStreamer};
