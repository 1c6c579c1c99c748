//! ### English
//! Render Surface Host: owns the paint queue consumer and the active streamer, negotiates size,
//! and turns each host frame into at most one textured quad.
//!
//! ### 中文
//! Render Surface Host：持有 paint 队列消费者与活动 streamer，协商尺寸，
//! 并把每个宿主帧转换为至多一个纹理四边形。
use std::rc::Rc;

use dpi::PhysicalSize;

use super::cursor::CursorShape;
use super::draw_list::{BoundingBox, FrameDrawList, TextureId};
use super::streamer::{ActiveStreamer, ApplyOutcome, BackendStreamer};
use crate::engine::config::SurfaceConfig;
use crate::engine::error::SurfaceError;
use crate::engine::frame::{FrameBuffer, PaintKind};
use crate::engine::paint::{PaintReceiver, PaintSink, paint_channel};
use crate::engine::surface::{SurfaceEvent, SurfaceHost};

/// ### English
/// Cumulative counters since creation.
///
/// ### 中文
/// 自创建以来的累计计数。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// ### English
    /// Full-surface frames handed to the streamer.
    ///
    /// ### 中文
    /// 交给 streamer 的 full-surface 帧数。
    pub frames_applied: u64,
    /// ### English
    /// Full-surface frames released unapplied because a later full-cover frame replaced them.
    ///
    /// ### 中文
    /// 因后续整帧覆盖而未上传即被释放的 full-surface 帧数。
    pub frames_coalesced: u64,
    pub overlays_dropped: u64,
    pub full_recreates: u64,
    pub partial_updates: u64,
    /// ### English
    /// Full recreates triggered by a failed partial update.
    ///
    /// ### 中文
    /// 由局部更新失败触发的完整重建次数。
    pub forced_recreates: u64,
}

/// ### English
/// Per-surface compositing state. Lives on the host render thread.
///
/// ### 中文
/// 每个 surface 的合成状态；存在于宿主渲染线程。
pub struct RenderSurfaceHost {
    receiver: PaintReceiver,
    sink: PaintSink,
    streamer: ActiveStreamer,
    surface: Rc<dyn SurfaceHost>,
    size: Option<PhysicalSize<u32>>,
    coalesce_full_frames: bool,
    drained: Vec<FrameBuffer>,
    stats: SurfaceStats,
    disposed: bool,
}

impl RenderSurfaceHost {
    /// ### English
    /// Creates a host over `backend`, notifying `surface` about size changes.
    ///
    /// ### 中文
    /// 基于 `backend` 创建 host，并在尺寸变化时通知 `surface`。
    pub fn new(
        backend: BackendStreamer,
        surface: Rc<dyn SurfaceHost>,
        config: &SurfaceConfig,
    ) -> Self {
        let (sink, receiver) = paint_channel(config.queue_warn_depth);
        log::debug!("render surface host created ({})", backend.backend_name());
        Self {
            receiver,
            sink,
            streamer: ActiveStreamer::new(backend),
            surface,
            size: None,
            coalesce_full_frames: config.coalesce_full_frames,
            drained: Vec::new(),
            stats: SurfaceStats::default(),
            disposed: false,
        }
    }

    /// ### English
    /// Producer handle for the browser's paint and cursor callbacks.
    ///
    /// ### 中文
    /// 供浏览器 paint 与光标回调使用的生产者句柄。
    pub fn paint_sink(&self) -> PaintSink {
        self.sink.clone()
    }

    /// ### English
    /// Records a new logical size and asks the browser to re-render at it. No-op when unchanged.
    ///
    /// ### 中文
    /// 记录新的逻辑尺寸，并请求浏览器按该尺寸重新渲染；尺寸未变化时不做任何事。
    pub fn set_size(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        let size = PhysicalSize::new(width.max(1), height.max(1));
        if self.size == Some(size) {
            return;
        }
        self.size = Some(size);
        self.surface.submit(SurfaceEvent::Resized {
            width: size.width,
            height: size.height,
        });
        self.surface.submit(SurfaceEvent::Invalidate);
    }

    /// ### English
    /// Per-frame entry point: drains every queued paint, applies full-surface frames in order,
    /// applies the pending cursor while hovered, and emits the texture quad.
    ///
    /// #### Parameters
    /// - `draw_list`: Host frame draw list.
    /// - `bounds`: Screen rectangle the quad covers.
    /// - `hovered`: Whether the pointer is over the surface this frame.
    ///
    /// ### 中文
    /// 每帧入口：drain 所有排队的 paint，按顺序应用 full-surface 帧，悬停时应用待处理光标，
    /// 并输出纹理四边形。
    ///
    /// #### 参数
    /// - `draw_list`：宿主帧绘制列表。
    /// - `bounds`：四边形覆盖的屏幕矩形。
    /// - `hovered`：本帧指针是否位于 surface 上。
    pub fn draw(
        &mut self,
        draw_list: &mut dyn FrameDrawList,
        bounds: BoundingBox,
        hovered: bool,
    ) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }

        self.drain_queue()?;

        if hovered {
            if let Some(kind) = self.receiver.cursor_request() {
                draw_list.set_mouse_cursor(CursorShape::from_platform(kind));
            }
        }

        if let Some(texture) = self.streamer.texture() {
            draw_list.add_image(texture, bounds.min, bounds.max);
        }
        Ok(())
    }

    fn drain_queue(&mut self) -> Result<(), SurfaceError> {
        let mut drained = std::mem::take(&mut self.drained);
        while let Some(frame) = self.receiver.try_dequeue() {
            drained.push(frame);
        }

        let replaced_before = if self.coalesce_full_frames {
            drained
                .iter()
                .rposition(|frame| frame.kind() == PaintKind::FullSurface && frame.is_full_cover())
                .unwrap_or(0)
        } else {
            0
        };

        let mut result = Ok(());
        for (index, frame) in drained.drain(..).enumerate() {
            if result.is_err() {
                frame.release();
                continue;
            }
            match frame.kind() {
                PaintKind::Overlay => {
                    self.stats.overlays_dropped += 1;
                    frame.release();
                }
                PaintKind::FullSurface if index < replaced_before => {
                    self.stats.frames_coalesced += 1;
                    frame.release();
                }
                PaintKind::FullSurface => {
                    result = self.apply(frame);
                }
            }
        }

        self.drained = drained;
        result
    }

    fn apply(&mut self, frame: FrameBuffer) -> Result<(), SurfaceError> {
        self.stats.frames_applied += 1;
        match self.streamer.apply(frame)? {
            ApplyOutcome::FullRecreate { forced } => {
                self.stats.full_recreates += 1;
                if forced {
                    self.stats.forced_recreates += 1;
                }
            }
            ApplyOutcome::Partial => self.stats.partial_updates += 1,
            ApplyOutcome::Unchanged => {}
            ApplyOutcome::PartialFailed(err) => {
                log::debug!("requesting repaint after failed update: {err}");
                self.surface.submit(SurfaceEvent::Invalidate);
            }
        }
        Ok(())
    }

    /// ### English
    /// Releases GPU resources and every still-queued paint. Idempotent.
    ///
    /// ### 中文
    /// 释放 GPU 资源以及所有仍在排队的 paint；幂等。
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let abandoned = self.receiver.close();
        for frame in self.drained.drain(..) {
            frame.release();
        }
        self.streamer.release();
        log::debug!("render surface host disposed ({abandoned} queued paints released)");
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// ### English
    /// Logical size last requested through `set_size`.
    ///
    /// ### 中文
    /// 最近一次通过 `set_size` 请求的逻辑尺寸。
    #[inline]
    pub fn size(&self) -> Option<PhysicalSize<u32>> {
        self.size
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.streamer.texture()
    }

    #[inline]
    pub fn texture_size(&self) -> Option<PhysicalSize<u32>> {
        self.streamer.texture_size()
    }

    #[inline]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    #[inline]
    pub fn queued_frames(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn queued_bytes(&self) -> usize {
        self.receiver.queued_bytes()
    }

    #[inline]
    pub fn backend(&self) -> &BackendStreamer {
        self.streamer.backend()
    }
}

impl Drop for RenderSurfaceHost {
    fn drop(&mut self) {
        self.dispose();
    }
}
