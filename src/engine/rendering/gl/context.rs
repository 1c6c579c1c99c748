//! ### English
//! Function loaders for the host's current OpenGL context.
//!
//! The host owns the context and keeps it current on the render thread; this only resolves
//! entry points through the host's `get_proc_address`.
//!
//! ### 中文
//! 宿主当前 OpenGL 上下文的函数加载器。
//!
//! 上下文由宿主持有，并在渲染线程保持 current；这里仅通过宿主的 `get_proc_address` 解析入口。
use std::ffi::{CString, c_char, c_void};
use std::rc::Rc;

use gleam::gl::{self, Gl};
use glow::HasContext as _;

use super::{GlStreamer, GleamTextureApi};

fn parse_gl_version(version: &str) -> (u32, u32) {
    // "4.6.0 NVIDIA 535.54" or "OpenGL ES 3.2 Mesa ..."
    let Some(token) = version
        .split_whitespace()
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
    else {
        return (0, 0);
    };
    let mut parts = token.split('.');
    let major = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (major, minor)
}

fn srgb_supported(is_gles: bool, major: u32, minor: u32) -> bool {
    if is_gles {
        major >= 3
    } else {
        major >= 3 || (major == 2 && minor >= 1)
    }
}

/// ### English
/// Resolved GL bindings for one host context.
///
/// ### 中文
/// 某个宿主上下文已解析的 GL 绑定。
pub struct HostGlContext {
    gl: Rc<dyn Gl>,
    is_gles: bool,
    srgb_supported: bool,
}

impl HostGlContext {
    /// ### English
    /// Loads gleam and glow through `loader` and probes the context version.
    ///
    /// #### Parameters
    /// - `loader`: Returns the address of a GL entry point, or null.
    ///
    /// ### 中文
    /// 通过 `loader` 加载 gleam 与 glow，并探测上下文版本。
    ///
    /// #### 参数
    /// - `loader`：返回 GL 入口地址（或 null）。
    pub fn load(mut loader: impl FnMut(&str) -> *const c_void) -> Self {
        let glow = unsafe { glow::Context::from_loader_function(|name| loader(name)) };
        let version = unsafe { glow.get_parameter_string(glow::VERSION) };
        let is_gles = version.starts_with("OpenGL ES");
        let (major, minor) = parse_gl_version(&version);
        log::debug!("host GL context: {version:?}");

        let gl: Rc<dyn Gl> = unsafe {
            if is_gles {
                gl::GlesFns::load_with(|name| loader(name))
            } else {
                gl::GlFns::load_with(|name| loader(name))
            }
        };

        Self {
            gl,
            is_gles,
            srgb_supported: srgb_supported(is_gles, major, minor),
        }
    }

    /// ### English
    /// Loader adapter for a C `get_proc_address(name, user_data)` callback.
    ///
    /// # Safety
    /// `get_proc_address` must be safe to call with a NUL-terminated name and `user_data`.
    ///
    /// ### 中文
    /// C 回调 `get_proc_address(name, user_data)` 的加载器适配。
    ///
    /// # Safety
    /// `get_proc_address` 必须可以安全地以 NUL 结尾的名称与 `user_data` 调用。
    pub unsafe fn load_with_c(
        get_proc_address: unsafe extern "C" fn(*const c_char, *mut c_void) -> *const c_void,
        user_data: *mut c_void,
    ) -> Self {
        Self::load(|name| match CString::new(name) {
            Ok(name) => unsafe { get_proc_address(name.as_ptr(), user_data) },
            Err(_) => std::ptr::null(),
        })
    }

    #[inline]
    pub fn gleam_gl(&self) -> Rc<dyn Gl> {
        self.gl.clone()
    }

    #[inline]
    pub fn is_gles(&self) -> bool {
        self.is_gles
    }

    #[inline]
    pub fn supports_srgb(&self) -> bool {
        self.srgb_supported
    }

    /// ### English
    /// Builds a streamer over this context; sRGB is only used when both requested and supported.
    ///
    /// ### 中文
    /// 基于该上下文构建 streamer；仅在请求且支持时使用 sRGB。
    pub fn streamer(&self, srgb: bool) -> GlStreamer {
        let srgb = srgb && self.srgb_supported;
        GlStreamer::new(Box::new(GleamTextureApi::new(self.gleam_gl())), srgb)
    }
}
