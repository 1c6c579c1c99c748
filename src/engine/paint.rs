//! ### English
//! Paint boundary between the browser's paint thread and the host render thread.
//!
//! The browser-side callbacks only build a `FrameBuffer` and push it; no other surface state is
//! touched from that thread. The render thread drains the queue once per host frame.
//!
//! ### 中文
//! 浏览器 paint 线程与宿主渲染线程之间的 paint 边界。
//!
//! 浏览器侧回调只负责构造 `FrameBuffer` 并 push；不会在该线程触碰任何其它 surface 状态。
//! 渲染线程在每个宿主帧 drain 一次队列。
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool, AtomicU32, AtomicUsize, Ordering};

use dpi::PhysicalSize;

use crate::engine::error::SurfaceError;
use crate::engine::frame::{DirtyRect, FrameBuffer, PaintKind};
use crate::engine::lockfree::{Backoff, MpscQueue};

/// ### English
/// Sentinel meaning "no cursor change has been requested yet".
///
/// ### 中文
/// 哨兵值：表示“尚未请求任何光标变化”。
const NO_CURSOR_REQUEST: u32 = u32::MAX;

struct PaintShared {
    queue: MpscQueue<FrameBuffer>,
    depth: AtomicUsize,
    queued_bytes: AtomicUsize,
    warn_depth: usize,
    /// ### English
    /// Latest raw cursor kind reported by the browser (latest wins).
    ///
    /// ### 中文
    /// 浏览器报告的最新原始光标类型（只保留最新值）。
    cursor: AtomicU32,
    closed: AtomicBool,
    /// ### English
    /// Consumer lock taken by whoever releases frames after `closed` is set.
    ///
    /// ### 中文
    /// `closed` 置位后负责释放帧的一方持有的消费者锁。
    draining: AtomicBool,
}

impl PaintShared {
    /// ### English
    /// Pops one frame and updates the counters.
    ///
    /// # Safety
    /// The caller must be the only consumer for the duration of the call.
    ///
    /// ### 中文
    /// 弹出一帧并更新计数。
    ///
    /// # Safety
    /// 调用期间调用者必须是唯一的消费者。
    unsafe fn pop(&self) -> Option<FrameBuffer> {
        let frame = unsafe { self.queue.pop() }?;
        self.depth.fetch_sub(1, Ordering::AcqRel);
        self.queued_bytes
            .fetch_sub(frame.pixels().len(), Ordering::Relaxed);
        Some(frame)
    }

    /// ### English
    /// Releases every queued frame once the queue is closed. Returns how many were dropped.
    ///
    /// A caller that finds the drain lock taken leaves its frames to the holder, which keeps
    /// going until the depth counter reaches zero.
    ///
    /// ### 中文
    /// 队列关闭后释放所有排队帧；返回被丢弃的数量。
    ///
    /// 发现 drain 锁已被占用的调用者会把帧留给持锁方，持锁方会持续释放直到深度计数归零。
    fn drain_closed(&self) -> usize {
        let mut dropped = 0;
        let mut backoff = Backoff::new();
        loop {
            if self
                .draining
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return dropped;
            }
            // The drain lock makes this thread the only consumer.
            while let Some(frame) = unsafe { self.pop() } {
                frame.release();
                dropped += 1;
            }
            self.draining.store(false, Ordering::Release);
            if self.depth.load(Ordering::Acquire) == 0 {
                return dropped;
            }
            // A producer counted its frame but has not linked it yet.
            backoff.snooze();
        }
    }
}

/// ### English
/// Creates a connected producer/consumer pair for one surface.
///
/// #### Parameters
/// - `warn_depth`: Queue depth at which a warning is logged (the queue itself is unbounded).
///
/// ### 中文
/// 为单个 surface 创建一对相连的生产者/消费者。
///
/// #### 参数
/// - `warn_depth`：记录警告的队列深度（队列本身无上限）。
pub fn paint_channel(warn_depth: usize) -> (PaintSink, PaintReceiver) {
    let shared = Arc::new(PaintShared {
        queue: MpscQueue::new(),
        depth: AtomicUsize::new(0),
        queued_bytes: AtomicUsize::new(0),
        warn_depth: warn_depth.max(1),
        cursor: AtomicU32::new(NO_CURSOR_REQUEST),
        closed: AtomicBool::new(false),
        draining: AtomicBool::new(false),
    });
    (
        PaintSink {
            shared: shared.clone(),
        },
        PaintReceiver { shared },
    )
}

/// ### English
/// Producer handle given to the browser client (`Send + Sync + Clone`).
///
/// ### 中文
/// 交给浏览器客户端的生产者句柄（`Send + Sync + Clone`）。
#[derive(Clone)]
pub struct PaintSink {
    shared: Arc<PaintShared>,
}

impl PaintSink {
    /// ### English
    /// Enqueues one frame. Never blocks; frames arriving after the surface is disposed are
    /// released immediately.
    ///
    /// ### 中文
    /// 入队一帧。不会阻塞；surface 已销毁后到达的帧会被立即释放。
    pub fn enqueue(&self, frame: FrameBuffer) {
        if self.shared.closed.load(Ordering::Acquire) {
            log::trace!("paint after dispose dropped");
            frame.release();
            return;
        }
        self.push_frame(frame);
    }

    fn push_frame(&self, frame: FrameBuffer) {
        let bytes = frame.pixels().len();
        self.shared.queued_bytes.fetch_add(bytes, Ordering::Relaxed);
        let depth = self.shared.depth.fetch_add(1, Ordering::Relaxed) + 1;
        if depth == self.shared.warn_depth {
            log::warn!(
                "paint queue reached {depth} frames; the render thread is not keeping up"
            );
        }
        self.shared.queue.push(frame);

        // Pairs with the fence in `PaintReceiver::close`: either the closer sees this frame or
        // this producer sees `closed`.
        atomic::fence(Ordering::SeqCst);
        if self.shared.closed.load(Ordering::SeqCst) {
            log::trace!("paint raced with dispose; releasing queued frames");
            self.shared.drain_closed();
        }
    }

    /// ### English
    /// Paint callback entry point: copies the browser buffer and enqueues it.
    ///
    /// #### Parameters
    /// - `kind`: Surface kind that painted.
    /// - `dirty_rect`: Changed region (clamped into the frame).
    /// - `pixels`: Browser BGRA8 buffer, valid only for this call.
    /// - `size`: Full buffer dimensions.
    ///
    /// ### 中文
    /// paint 回调入口：拷贝浏览器缓冲区并入队。
    ///
    /// #### 参数
    /// - `kind`：产生 paint 的表面类型。
    /// - `dirty_rect`：变化区域（会裁剪到帧内）。
    /// - `pixels`：浏览器 BGRA8 缓冲区，仅在本次调用期间有效。
    /// - `size`：完整缓冲区尺寸。
    pub fn on_paint(
        &self,
        kind: PaintKind,
        dirty_rect: DirtyRect,
        pixels: &[u8],
        size: PhysicalSize<u32>,
    ) -> Result<(), SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::Disposed);
        }
        let frame = FrameBuffer::copy_from(kind, dirty_rect, pixels, size)?;
        self.enqueue(frame);
        Ok(())
    }

    /// ### English
    /// Raw-pointer variant of [`Self::on_paint`] used by the C ABI.
    ///
    /// # Safety
    /// `pixels` must be readable for `width * height * 4` bytes during the call.
    ///
    /// ### 中文
    /// [`Self::on_paint`] 的裸指针版本，供 C ABI 使用。
    ///
    /// # Safety
    /// 调用期间 `pixels` 必须可读 `width * height * 4` 字节。
    pub unsafe fn on_paint_raw(
        &self,
        kind: PaintKind,
        dirty_rect: DirtyRect,
        pixels: *const u8,
        size: PhysicalSize<u32>,
    ) -> Result<(), SurfaceError> {
        if self.is_closed() {
            return Err(SurfaceError::Disposed);
        }
        let frame = unsafe { FrameBuffer::copy_from_raw(kind, dirty_rect, pixels, size)? };
        self.enqueue(frame);
        Ok(())
    }

    /// ### English
    /// Cursor callback entry point: records the browser's cursor kind for the next draw.
    ///
    /// ### 中文
    /// 光标回调入口：记录浏览器的光标类型，供下一次 draw 使用。
    pub fn on_cursor_change(&self, platform_kind: u32) {
        let value = if platform_kind == NO_CURSOR_REQUEST {
            0
        } else {
            platform_kind
        };
        self.shared.cursor.store(value, Ordering::Release);
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

/// ### English
/// Single consumer handle owned by the render surface host. Not `Clone`: exactly one thread drains.
///
/// ### 中文
/// 由 render surface host 持有的唯一消费者句柄。不可 `Clone`：只有一个线程 drain。
pub struct PaintReceiver {
    shared: Arc<PaintShared>,
}

impl PaintReceiver {
    /// ### English
    /// Takes the oldest queued frame without blocking.
    ///
    /// ### 中文
    /// 非阻塞地取出最早入队的帧。
    pub fn try_dequeue(&mut self) -> Option<FrameBuffer> {
        // Once closed, only the drain lock holder may pop.
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        // `&mut self` on the only receiver serializes every `pop` until then.
        unsafe { self.shared.pop() }
    }

    /// ### English
    /// Number of frames currently queued.
    ///
    /// ### 中文
    /// 当前排队的帧数。
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.depth.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ### English
    /// Pixel bytes currently held by queued frames.
    ///
    /// ### 中文
    /// 排队帧当前持有的像素字节数。
    #[inline]
    pub fn queued_bytes(&self) -> usize {
        self.shared.queued_bytes.load(Ordering::Relaxed)
    }

    /// ### English
    /// Latest raw cursor kind requested by the browser, if any.
    ///
    /// ### 中文
    /// 浏览器请求的最新原始光标类型（若有）。
    #[inline]
    pub fn cursor_request(&self) -> Option<u32> {
        let raw = self.shared.cursor.load(Ordering::Acquire);
        (raw != NO_CURSOR_REQUEST).then_some(raw)
    }

    /// ### English
    /// Stops accepting frames and releases everything still queued. Returns how many were dropped.
    ///
    /// ### 中文
    /// 停止接收新帧，并释放仍在队列中的所有帧；返回被丢弃的数量。
    pub fn close(&mut self) -> usize {
        self.shared.closed.store(true, Ordering::SeqCst);
        atomic::fence(Ordering::SeqCst);
        self.shared.drain_closed()
    }
}
