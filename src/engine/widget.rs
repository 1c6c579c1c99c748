//! ### English
//! Host Surface Widget: the per-frame entry point tying input, sizing and compositing together.
//!
//! ### 中文
//! Host Surface Widget：把输入、尺寸与合成串联起来的每帧入口。
use std::rc::Rc;

use dpi::PhysicalSize;
use url::Url;

use crate::engine::config::SurfaceConfig;
use crate::engine::error::SurfaceError;
use crate::engine::input::{InputRouting, InputTranslator, PlatformEvent};
use crate::engine::lifecycle::{self, BrowserEngine};
use crate::engine::paint::PaintSink;
use crate::engine::rendering::{
    BackendStreamer, BoundingBox, FrameDrawList, RenderSurfaceHost, SurfaceStats,
};
use crate::engine::surface::{SurfaceEvent, SurfaceHost};

/// ### English
/// Layout and interaction state the host GUI computed for the widget this frame.
///
/// ### 中文
/// 宿主 GUI 本帧为该 widget 计算出的布局与交互状态。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidgetFrame {
    /// ### English
    /// Screen-space top-left corner.
    ///
    /// ### 中文
    /// 屏幕空间左上角。
    pub origin: [f32; 2],
    pub size: PhysicalSize<u32>,
    pub hovered: bool,
    /// ### English
    /// Whether the host currently gives this widget keyboard focus.
    ///
    /// ### 中文
    /// 宿主当前是否把键盘焦点交给该 widget。
    pub focused: bool,
    /// ### English
    /// Seconds since the previous frame.
    ///
    /// ### 中文
    /// 距上一帧的秒数。
    pub delta_time: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetResponse {
    /// ### English
    /// The host should move keyboard focus to this widget.
    ///
    /// ### 中文
    /// 宿主应把键盘焦点移到该 widget。
    pub request_keyboard_focus: bool,
}

/// ### English
/// One embedded browser surface inside the host GUI.
///
/// ### 中文
/// 宿主 GUI 中的一个嵌入式浏览器 surface。
pub struct SurfaceWidget {
    translator: InputTranslator,
    host: RenderSurfaceHost,
    surface: Rc<dyn SurfaceHost>,
    hovered: bool,
    focused: bool,
    clicked_this_frame: bool,
}

impl SurfaceWidget {
    /// ### English
    /// Creates a widget for `window_id` compositing through `backend`.
    ///
    /// #### Parameters
    /// - `window_id`: Platform window whose input events this widget consumes.
    /// - `backend`: Texture streamer matching the host's graphics API.
    /// - `surface`: Embedded browser surface receiving input and size events.
    /// - `config`: Per-surface options.
    ///
    /// ### 中文
    /// 为 `window_id` 创建 widget，通过 `backend` 进行合成。
    ///
    /// #### 参数
    /// - `window_id`：该 widget 消费其输入事件的平台窗口。
    /// - `backend`：与宿主图形 API 匹配的纹理 streamer。
    /// - `surface`：接收输入与尺寸事件的嵌入式浏览器 surface。
    /// - `config`：每个 surface 的选项。
    pub fn new(
        window_id: u32,
        backend: BackendStreamer,
        surface: Rc<dyn SurfaceHost>,
        config: &SurfaceConfig,
    ) -> Self {
        let config = config.clone().sanitized();
        Self {
            translator: InputTranslator::new(window_id, &config),
            host: RenderSurfaceHost::new(backend, surface.clone(), &config),
            surface,
            hovered: false,
            focused: false,
            clicked_this_frame: false,
        }
    }

    /// ### English
    /// Like `new`, but first makes sure the process-wide browser engine is initialized.
    ///
    /// ### 中文
    /// 与 `new` 相同，但会先确保进程级浏览器引擎已初始化。
    pub fn with_engine(
        engine: &dyn BrowserEngine,
        window_id: u32,
        backend: BackendStreamer,
        surface: Rc<dyn SurfaceHost>,
        config: &SurfaceConfig,
    ) -> Result<Self, SurfaceError> {
        lifecycle::global().ensure_initialized(engine)?;
        Ok(Self::new(window_id, backend, surface, config))
    }

    /// ### English
    /// Feeds one platform event through the translator using last frame's hover/focus.
    /// Returns whether it was forwarded.
    ///
    /// ### 中文
    /// 以上一帧的悬停/焦点状态将一个平台事件送入转换器；返回是否已转发。
    pub fn handle_event(&mut self, event: &PlatformEvent) -> bool {
        let routing = InputRouting {
            hovered: self.hovered,
            focused: self.focused,
        };
        let forwarded = self.translator.handle(event, routing, &*self.surface);
        if forwarded && self.hovered {
            if let PlatformEvent::MouseButton { pressed: true, .. } = event {
                self.clicked_this_frame = true;
            }
        }
        forwarded
    }

    /// ### English
    /// Runs one host frame: layout, hover/focus transitions, smooth-scroll flush, compositing.
    ///
    /// ### 中文
    /// 执行一个宿主帧：布局、悬停/焦点切换、平滑滚动清算、合成。
    pub fn frame(
        &mut self,
        frame: WidgetFrame,
        draw_list: &mut dyn FrameDrawList,
    ) -> Result<WidgetResponse, SurfaceError> {
        self.translator.set_origin(frame.origin);
        self.host.set_size(frame.size.width, frame.size.height);

        if self.hovered && !frame.hovered {
            self.translator.mouse_leave(&*self.surface);
        }
        self.hovered = frame.hovered;

        let response = self.update_focus(frame.focused);
        self.clicked_this_frame = false;

        self.translator.tick(frame.delta_time, &*self.surface);

        let bounds = BoundingBox::from_origin_size(
            frame.origin,
            [frame.size.width as f32, frame.size.height as f32],
        );
        self.host.draw(draw_list, bounds, frame.hovered)?;
        Ok(response)
    }

    fn update_focus(&mut self, host_focused: bool) -> WidgetResponse {
        let wants_focus = host_focused || self.clicked_this_frame;
        let mut response = WidgetResponse::default();
        if wants_focus && !self.focused {
            self.focused = true;
            self.surface.submit(SurfaceEvent::Focus(true));
            response.request_keyboard_focus = true;
        } else if !wants_focus && self.focused {
            self.focused = false;
            self.surface.submit(SurfaceEvent::Focus(false));
        } else if self.clicked_this_frame && !host_focused {
            response.request_keyboard_focus = true;
        }
        response
    }

    /// ### English
    /// Asks the embedded surface to load `url`.
    ///
    /// ### 中文
    /// 请求嵌入 surface 加载 `url`。
    pub fn navigate(&self, url: &str) -> Result<(), SurfaceError> {
        if self.host.is_disposed() {
            return Err(SurfaceError::Disposed);
        }
        let url = Url::parse(url)?;
        self.surface.submit(SurfaceEvent::LoadUrl(url));
        Ok(())
    }

    /// ### English
    /// Resizes the embedded surface outside of a frame (e.g. before the first paint).
    ///
    /// ### 中文
    /// 在帧之外调整嵌入 surface 的尺寸（例如在首次 paint 之前）。
    pub fn set_size(&mut self, size: PhysicalSize<u32>) {
        self.host.set_size(size.width, size.height);
    }

    #[inline]
    pub fn paint_sink(&self) -> PaintSink {
        self.host.paint_sink()
    }

    #[inline]
    pub fn render_host(&self) -> &RenderSurfaceHost {
        &self.host
    }

    #[inline]
    pub fn stats(&self) -> SurfaceStats {
        self.host.stats()
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn dispose(&mut self) {
        self.host.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::engine::frame::{DirtyRect, PaintKind};
    use crate::engine::input::PLATFORM_BUTTON_LEFT;
    use crate::engine::rendering::draw_list::testing::RecordingDrawList;
    use crate::engine::rendering::gl::GlStreamer;
    use crate::engine::rendering::software::SoftwareGl;
    use crate::engine::surface::testing::RecordingHost;

    const WINDOW: u32 = 1;

    fn widget() -> (SurfaceWidget, Rc<RecordingHost>) {
        let surface = Rc::new(RecordingHost::default());
        let widget = SurfaceWidget::new(
            WINDOW,
            BackendStreamer::OpenGl(GlStreamer::new(Box::new(SoftwareGl::new()), false)),
            surface.clone(),
            &SurfaceConfig::default(),
        );
        (widget, surface)
    }

    fn frame(hovered: bool, focused: bool) -> WidgetFrame {
        WidgetFrame {
            origin: [50.0, 40.0],
            size: PhysicalSize::new(64, 32),
            hovered,
            focused,
            delta_time: 1.0 / 60.0,
        }
    }

    fn click(pressed: bool) -> PlatformEvent {
        PlatformEvent::MouseButton {
            window_id: WINDOW,
            button: PLATFORM_BUTTON_LEFT,
            pressed,
            clicks: 1,
            x: 60.0,
            y: 45.0,
        }
    }

    #[test]
    fn first_frame_sizes_the_surface() {
        let (mut widget, surface) = widget();
        let mut list = RecordingDrawList::default();
        widget.frame(frame(false, false), &mut list).unwrap();
        assert_eq!(
            surface.take(),
            vec![
                SurfaceEvent::Resized {
                    width: 64,
                    height: 32
                },
                SurfaceEvent::Invalidate,
            ]
        );
        assert!(list.images.is_empty());
    }

    #[test]
    fn painted_frame_is_drawn_at_widget_bounds() {
        let (mut widget, _surface) = widget();
        let sink = widget.paint_sink();
        sink.on_paint(
            PaintKind::FullSurface,
            DirtyRect::full(64, 32),
            &vec![7; 64 * 32 * 4],
            PhysicalSize::new(64, 32),
        )
        .unwrap();

        let mut list = RecordingDrawList::default();
        widget.frame(frame(false, false), &mut list).unwrap();
        assert_eq!(list.images.len(), 1);
        let (_, min, max) = list.images[0];
        assert_eq!((min, max), ([50.0, 40.0], [114.0, 72.0]));
    }

    #[test]
    fn leaving_hover_reports_mouse_leave() {
        let (mut widget, surface) = widget();
        let mut list = RecordingDrawList::default();
        widget.frame(frame(true, false), &mut list).unwrap();
        widget.handle_event(&PlatformEvent::MouseMotion {
            window_id: WINDOW,
            x: 70.0,
            y: 50.0,
        });
        surface.take();

        widget.frame(frame(false, false), &mut list).unwrap();
        assert!(surface.take().iter().any(|event| matches!(
            event,
            SurfaceEvent::MouseMove {
                x: 20,
                y: 10,
                leave: true,
                ..
            }
        )));
    }

    #[test]
    fn click_to_focus_requests_keyboard_focus_once() {
        let (mut widget, surface) = widget();
        let mut list = RecordingDrawList::default();
        widget.frame(frame(true, false), &mut list).unwrap();
        surface.take();

        assert!(widget.handle_event(&click(true)));
        let response = widget.frame(frame(true, false), &mut list).unwrap();
        assert!(response.request_keyboard_focus);
        assert!(widget.is_focused());
        assert!(surface.take().contains(&SurfaceEvent::Focus(true)));

        let response = widget.frame(frame(true, true), &mut list).unwrap();
        assert!(!response.request_keyboard_focus);
        assert!(!surface.take().iter().any(|event| matches!(event, SurfaceEvent::Focus(_))));
    }

    #[test]
    fn losing_focus_notifies_unless_reclaimed_by_click() {
        let (mut widget, surface) = widget();
        let mut list = RecordingDrawList::default();
        widget.frame(frame(true, true), &mut list).unwrap();
        surface.take();

        widget.handle_event(&click(true));
        widget.frame(frame(true, false), &mut list).unwrap();
        assert!(!surface.take().contains(&SurfaceEvent::Focus(false)));
        assert!(widget.is_focused());

        widget.frame(frame(true, false), &mut list).unwrap();
        assert!(surface.take().contains(&SurfaceEvent::Focus(false)));
        assert!(!widget.is_focused());
    }

    #[test]
    fn navigate_validates_urls() {
        let (widget, surface) = widget();
        assert!(matches!(
            widget.navigate("not a url"),
            Err(SurfaceError::InvalidUrl(_))
        ));
        widget.navigate("https://example.org/").unwrap();
        assert!(matches!(
            &surface.take()[..],
            [SurfaceEvent::LoadUrl(url)] if url.as_str() == "https://example.org/"
        ));
    }

    #[test]
    fn disposed_widget_rejects_frames() {
        let (mut widget, _surface) = widget();
        widget.dispose();
        let mut list = RecordingDrawList::default();
        assert!(matches!(
            widget.frame(frame(false, false), &mut list),
            Err(SurfaceError::Disposed)
        ));
        assert!(matches!(
            widget.navigate("https://example.org/"),
            Err(SurfaceError::Disposed)
        ));
    }

    struct CountingEngine(AtomicUsize);

    impl BrowserEngine for CountingEngine {
        fn initialize(&self) -> Result<(), SurfaceError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn shutdown(&self) {}
    }

    #[test]
    fn engine_is_initialized_lazily_for_widgets() {
        let engine = CountingEngine(AtomicUsize::new(0));
        for _ in 0..3 {
            let surface: Rc<dyn SurfaceHost> = Rc::new(RecordingHost::default());
            SurfaceWidget::with_engine(
                &engine,
                WINDOW,
                BackendStreamer::OpenGl(GlStreamer::new(Box::new(SoftwareGl::new()), false)),
                surface,
                &SurfaceConfig::default(),
            )
            .unwrap();
        }
        assert!(lifecycle::global().is_ready());
        assert!(engine.0.load(Ordering::SeqCst) <= 1);
    }
}
