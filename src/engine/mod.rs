/// ### English
/// Engine internal modules (paint boundary, compositing, input translation, lifecycle).
///
/// ### 中文
/// 引擎内部模块（paint 边界、合成、输入转换、生命周期等）。
pub mod config;
pub mod error;
pub mod flags;
pub mod frame;
pub mod input;
pub mod lifecycle;
pub(crate) mod lockfree;
pub mod paint;
pub mod rendering;
pub mod surface;
pub mod widget;

pub use config::{ScrollScale, SurfaceConfig};
pub use error::SurfaceError;
pub use frame::{DirtyRect, FrameBuffer, PaintKind};
pub use lifecycle::{BrowserEngine, Lifecycle};
pub use paint::{PaintReceiver, PaintSink, paint_channel};
pub use surface::{KeyEvent, KeyEventKind, MouseButton, SurfaceEvent, SurfaceHost};
pub use widget::{SurfaceWidget, WidgetFrame, WidgetResponse};
