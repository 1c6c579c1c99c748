//! ### English
//! C ABI bindings for the process-wide browser engine lifecycle (init/shutdown).
//!
//! ### 中文
//! 进程级浏览器引擎生命周期相关的 C ABI 绑定（init/shutdown）。

use std::ffi::c_void;

use super::{WEB_SURFACE_ERROR_INVALID_ARGUMENT, status};
use crate::engine::error::SurfaceError;
use crate::engine::lifecycle::{self, BrowserEngine};

#[repr(C)]
#[derive(Clone, Copy)]
/// ### English
/// Embedder-provided engine hooks.
///
/// `initialize` returns `true` on success. Both hooks are called with `user_data`, on the thread
/// that calls `web_surface_engine_init` / `web_surface_engine_shutdown` (or the first
/// `web_surface_create_*` that passes the hooks).
///
/// ### 中文
/// 宿主提供的引擎钩子。
///
/// `initialize` 成功时返回 `true`。两个钩子都以 `user_data` 调用，所在线程为调用
/// `web_surface_engine_init` / `web_surface_engine_shutdown`（或传入钩子的首个
/// `web_surface_create_*`）的线程。
pub struct WebSurfaceEngineHooks {
    pub user_data: *mut c_void,
    pub initialize: Option<unsafe extern "C" fn(user_data: *mut c_void) -> bool>,
    pub shutdown: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
}

/// ### English
/// `BrowserEngine` backed by C hooks.
///
/// ### 中文
/// 由 C 钩子实现的 `BrowserEngine`。
pub(super) struct HookedEngine {
    hooks: WebSurfaceEngineHooks,
}

// The lifecycle barrier serializes every hook call; `user_data` is the embedder's to guard.
unsafe impl Sync for HookedEngine {}

impl HookedEngine {
    /// ### English
    /// # Safety
    /// `hooks` must be NULL or point to a valid `WebSurfaceEngineHooks`.
    ///
    /// ### 中文
    /// # Safety
    /// `hooks` 必须为 NULL 或指向合法的 `WebSurfaceEngineHooks`。
    pub(super) unsafe fn from_ptr(hooks: *const WebSurfaceEngineHooks) -> Option<Self> {
        if hooks.is_null() {
            return None;
        }
        Some(Self {
            hooks: unsafe { *hooks },
        })
    }
}

impl BrowserEngine for HookedEngine {
    fn initialize(&self) -> Result<(), SurfaceError> {
        let Some(initialize) = self.hooks.initialize else {
            return Ok(());
        };
        if unsafe { initialize(self.hooks.user_data) } {
            Ok(())
        } else {
            Err(SurfaceError::EngineInit(
                "embedder initialize hook returned false".to_string(),
            ))
        }
    }

    fn shutdown(&self) {
        if let Some(shutdown) = self.hooks.shutdown {
            unsafe { shutdown(self.hooks.user_data) };
        }
    }
}

#[unsafe(no_mangle)]
/// ### English
/// Initializes the browser engine once per process. Later calls return `WEB_SURFACE_OK`
/// without calling the hook again.
///
/// ### 中文
/// 每个进程初始化一次浏览器引擎；之后的调用直接返回 `WEB_SURFACE_OK`，不会再次调用钩子。
pub unsafe extern "C" fn web_surface_engine_init(hooks: *const WebSurfaceEngineHooks) -> i32 {
    let Some(engine) = (unsafe { HookedEngine::from_ptr(hooks) }) else {
        return WEB_SURFACE_ERROR_INVALID_ARGUMENT;
    };
    status(lifecycle::global().ensure_initialized(&engine))
}

#[unsafe(no_mangle)]
/// ### English
/// Shuts the browser engine down. Destroy every surface first.
///
/// Returns `true` if this call ran the shutdown hook.
///
/// ### 中文
/// 关闭浏览器引擎；调用前请先销毁所有 surface。
///
/// 若本次调用执行了 shutdown 钩子则返回 `true`。
pub unsafe extern "C" fn web_surface_engine_shutdown(hooks: *const WebSurfaceEngineHooks) -> bool {
    let Some(engine) = (unsafe { HookedEngine::from_ptr(hooks) }) else {
        return false;
    };
    lifecycle::shutdown_engine(&engine)
}

#[unsafe(no_mangle)]
/// ### English
/// Whether the browser engine is initialized.
///
/// ### 中文
/// 浏览器引擎是否已初始化。
pub extern "C" fn web_surface_engine_is_ready() -> bool {
    lifecycle::global().is_ready()
}
