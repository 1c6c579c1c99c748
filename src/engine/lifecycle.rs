//! ### English
//! Process-wide browser engine lifecycle.
//!
//! The engine is initialized lazily by the first surface and torn down explicitly at exit.
//! Concurrent `ensure_initialized` calls are serialized by a single atomic state machine: one
//! caller runs `initialize`, the rest back off until it finishes.
//!
//! ### 中文
//! 进程级浏览器引擎生命周期。
//!
//! 引擎由第一个 surface 惰性初始化，并在退出时显式关闭。
//! 并发的 `ensure_initialized` 调用由单个原子状态机串行化：只有一个调用者执行 `initialize`，
//! 其余调用者退避等待其完成。
use std::sync::atomic::{AtomicU8, Ordering};

use crate::engine::error::SurfaceError;
use crate::engine::lockfree::Backoff;

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const READY: u8 = 2;
const SHUTTING_DOWN: u8 = 3;

/// ### English
/// The embedded browser runtime as seen by this crate: a one-time init and a final shutdown.
///
/// ### 中文
/// 本 crate 视角下的嵌入式浏览器运行时：一次性初始化与最终关闭。
pub trait BrowserEngine: Sync {
    fn initialize(&self) -> Result<(), SurfaceError>;
    fn shutdown(&self);
}

/// ### English
/// Initialization barrier around a `BrowserEngine`.
///
/// ### 中文
/// 围绕 `BrowserEngine` 的初始化屏障。
pub struct Lifecycle {
    state: AtomicU8,
}

static GLOBAL: Lifecycle = Lifecycle::new();

/// ### English
/// The process-wide lifecycle used by surfaces and the C ABI.
///
/// ### 中文
/// surface 与 C ABI 使用的进程级生命周期。
pub fn global() -> &'static Lifecycle {
    &GLOBAL
}

/// ### English
/// Tears down the process-wide engine. Returns whether a shutdown actually ran.
///
/// ### 中文
/// 关闭进程级引擎；返回是否真正执行了关闭。
pub fn shutdown_engine(engine: &dyn BrowserEngine) -> bool {
    GLOBAL.shutdown(engine)
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// ### English
    /// Initializes `engine` unless already ready. Blocks (spin/yield/sleep) while another thread
    /// is initializing or shutting down; a failed init leaves the state uninitialized so a later
    /// call may retry.
    ///
    /// ### 中文
    /// 若尚未就绪则初始化 `engine`。其它线程正在初始化或关闭时会阻塞（自旋/让出/sleep）；
    /// 初始化失败会恢复为未初始化状态，以便后续调用重试。
    pub fn ensure_initialized(&self, engine: &dyn BrowserEngine) -> Result<(), SurfaceError> {
        let mut backoff = Backoff::new();
        loop {
            match self.state.compare_exchange(
                UNINITIALIZED,
                INITIALIZING,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    log::debug!("initializing browser engine");
                    return match engine.initialize() {
                        Ok(()) => {
                            self.state.store(READY, Ordering::Release);
                            log::debug!("browser engine ready");
                            Ok(())
                        }
                        Err(err) => {
                            self.state.store(UNINITIALIZED, Ordering::Release);
                            log::error!("browser engine initialization failed: {err}");
                            Err(err)
                        }
                    };
                }
                Err(READY) => return Ok(()),
                Err(_) => backoff.snooze(),
            }
        }
    }

    /// ### English
    /// Shuts `engine` down if it is ready. Returns whether this call performed the shutdown.
    ///
    /// ### 中文
    /// 若引擎已就绪则关闭它；返回本次调用是否执行了关闭。
    pub fn shutdown(&self, engine: &dyn BrowserEngine) -> bool {
        if self
            .state
            .compare_exchange(READY, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        log::debug!("shutting down browser engine");
        engine.shutdown();
        self.state.store(UNINITIALIZED, Ordering::Release);
        true
    }
}
