//! ### English
//! Full-recreate vs. partial-update policy shared by both backends.
//!
//! ### 中文
//! 两个后端共用的“完整重建 / 局部更新”策略。
use dpi::PhysicalSize;

use super::d3d11::D3D11Streamer;
use super::draw_list::TextureId;
use super::gl::GlStreamer;
use crate::engine::error::SurfaceError;
use crate::engine::frame::FrameBuffer;

/// ### English
/// Backend execution of the two upload paths.
///
/// ### 中文
/// 两种上传路径的后端执行。
pub trait TextureStreamer {
    /// ### English
    /// Current texture, if one has been created.
    ///
    /// ### 中文
    /// 当前纹理（若已创建）。
    fn texture(&self) -> Option<TextureId>;

    /// ### English
    /// Dimensions of the current texture.
    ///
    /// ### 中文
    /// 当前纹理的尺寸。
    fn texture_size(&self) -> Option<PhysicalSize<u32>>;

    /// ### English
    /// Creates a `frame`-sized texture from the whole buffer and releases the previous one.
    /// On failure the previous texture is kept.
    ///
    /// ### 中文
    /// 以整块缓冲区创建与 `frame` 同尺寸的纹理，并释放旧纹理；失败时保留旧纹理。
    fn apply_full(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError>;

    /// ### English
    /// Uploads only `frame.dirty_rect()` into the existing, same-sized texture.
    ///
    /// ### 中文
    /// 仅将 `frame.dirty_rect()` 上传到已存在且尺寸一致的纹理。
    fn apply_partial(&mut self, frame: &FrameBuffer) -> Result<(), SurfaceError>;

    /// ### English
    /// Releases the backend texture (and view). Safe to call repeatedly.
    ///
    /// ### 中文
    /// 释放后端纹理（及视图）；可重复调用。
    fn release(&mut self);
}

/// ### English
/// Active backend, chosen once when the surface is created.
///
/// ### 中文
/// 活动后端，在创建 surface 时选定一次。
pub enum BackendStreamer {
    D3D11(D3D11Streamer),
    OpenGl(GlStreamer),
}

impl BackendStreamer {
    fn as_streamer(&self) -> &dyn TextureStreamer {
        match self {
            BackendStreamer::D3D11(streamer) => streamer,
            BackendStreamer::OpenGl(streamer) => streamer,
        }
    }

    fn as_streamer_mut(&mut self) -> &mut dyn TextureStreamer {
        match self {
            BackendStreamer::D3D11(streamer) => streamer,
            BackendStreamer::OpenGl(streamer) => streamer,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            BackendStreamer::D3D11(_) => "d3d11",
            BackendStreamer::OpenGl(_) => "opengl",
        }
    }
}

/// ### English
/// What one `apply` did.
///
/// ### 中文
/// 单次 `apply` 的结果。
#[derive(Debug)]
pub(crate) enum ApplyOutcome {
    FullRecreate {
        /// ### English
        /// Recreate forced by an earlier partial-update failure.
        ///
        /// ### 中文
        /// 由之前的局部更新失败强制触发的重建。
        forced: bool,
    },
    Partial,
    /// ### English
    /// Nothing to upload (empty dirty rect on a matching texture).
    ///
    /// ### 中文
    /// 无需上传（尺寸匹配且脏矩形为空）。
    Unchanged,
    /// ### English
    /// Partial update failed; the next apply is forced into a full recreate.
    ///
    /// ### 中文
    /// 局部更新失败；下一次 apply 将被强制走完整重建。
    PartialFailed(SurfaceError),
}

/// ### English
/// Backend plus the recreate policy state.
///
/// ### 中文
/// 后端及其重建策略状态。
pub(crate) struct ActiveStreamer {
    backend: BackendStreamer,
    force_recreate: bool,
}

impl ActiveStreamer {
    pub(crate) fn new(backend: BackendStreamer) -> Self {
        Self {
            backend,
            force_recreate: false,
        }
    }

    #[inline]
    pub(crate) fn backend(&self) -> &BackendStreamer {
        &self.backend
    }

    #[inline]
    pub(crate) fn texture(&self) -> Option<TextureId> {
        self.backend.as_streamer().texture()
    }

    #[inline]
    pub(crate) fn texture_size(&self) -> Option<PhysicalSize<u32>> {
        self.backend.as_streamer().texture_size()
    }

    /// ### English
    /// Applies one full-surface frame and releases it.
    ///
    /// Creation failures are returned as errors; partial-update failures are reported through
    /// `ApplyOutcome::PartialFailed` and arm a forced recreate.
    ///
    /// ### 中文
    /// 应用一个 full-surface 帧并释放它。
    ///
    /// 创建失败以错误返回；局部更新失败通过 `ApplyOutcome::PartialFailed` 报告，并触发强制重建。
    pub(crate) fn apply(&mut self, frame: FrameBuffer) -> Result<ApplyOutcome, SurfaceError> {
        let outcome = self.apply_frame(&frame);
        frame.release();
        outcome
    }

    fn apply_frame(&mut self, frame: &FrameBuffer) -> Result<ApplyOutcome, SurfaceError> {
        let forced = self.force_recreate;
        let streamer = self.backend.as_streamer_mut();
        let size_matches =
            streamer.texture().is_some() && streamer.texture_size() == Some(frame.size());

        if forced || !size_matches {
            log::trace!(
                "full recreate {}x{} (forced: {forced})",
                frame.width(),
                frame.height()
            );
            if let Err(err) = streamer.apply_full(frame) {
                log::error!("texture creation failed: {err}");
                return Err(err);
            }
            self.force_recreate = false;
            return Ok(ApplyOutcome::FullRecreate { forced });
        }

        if frame.dirty_rect().is_empty() {
            return Ok(ApplyOutcome::Unchanged);
        }

        log::trace!("partial update {:?}", frame.dirty_rect());
        match streamer.apply_partial(frame) {
            Ok(()) => Ok(ApplyOutcome::Partial),
            Err(err) => {
                log::warn!("partial texture update failed, forcing recreate: {err}");
                self.force_recreate = true;
                Ok(ApplyOutcome::PartialFailed(err))
            }
        }
    }

    pub(crate) fn release(&mut self) {
        self.backend.as_streamer_mut().release();
        self.force_recreate = false;
    }
}
