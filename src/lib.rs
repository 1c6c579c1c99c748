/// ### English
/// `web_surface` crate root.
/// Composites an off-screen browser surface into a host GUI frame (Direct3D 11 or OpenGL) and
/// translates host input for it. The Rust API lives under `engine`; the C ABI under `ffi`.
///
/// ### 中文
/// `web_surface` 的 crate 根。
/// 将离屏浏览器 surface 合成进宿主 GUI 帧（Direct3D 11 或 OpenGL），并为其转换宿主输入。
/// Rust API 位于 `engine`；C ABI 位于 `ffi`。
pub mod engine;
mod ffi;

pub use engine::input::{EventFlags, InputTranslator, PlatformEvent};
pub use engine::rendering::{
    BackendStreamer, BoundingBox, CursorShape, FrameDrawList, RenderSurfaceHost, SurfaceStats,
    TextureId,
};
pub use engine::{
    BrowserEngine, DirtyRect, FrameBuffer, PaintKind, PaintSink, SurfaceConfig, SurfaceError,
    SurfaceEvent, SurfaceHost, SurfaceWidget, WidgetFrame, WidgetResponse,
};
