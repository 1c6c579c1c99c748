//! ### English
//! Error type shared by the compositing bridge and the input pipeline.
//!
//! ### 中文
//! 合成桥与输入管线共用的错误类型。

/// ### English
/// Errors surfaced by the surface host, the texture streamers and the paint boundary.
///
/// Malformed text input and unknown cursor kinds are recovered locally and never show up here.
///
/// ### 中文
/// 由 surface host、纹理 streamer 以及 paint 边界抛出的错误。
///
/// 非法文本输入与未知光标类型在本地恢复，不会出现在这里。
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to allocate {bytes} bytes for a paint buffer")]
    Allocation { bytes: usize },

    #[error("Invalid paint buffer: {0}")]
    InvalidFrame(String),

    #[error("Texture creation failed: {0}")]
    TextureCreation(String),

    #[error("Texture update failed: {0}")]
    TextureUpdate(String),

    #[error("Graphics device lost")]
    DeviceLost,

    #[error("Browser engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Surface already disposed")]
    Disposed,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SurfaceError {
    /// ### English
    /// Stable negative status code used by the C ABI.
    ///
    /// ### 中文
    /// C ABI 使用的稳定负数状态码。
    pub fn status_code(&self) -> i32 {
        match self {
            SurfaceError::Allocation { .. } => -1,
            SurfaceError::InvalidFrame(_) => -2,
            SurfaceError::TextureCreation(_) => -3,
            SurfaceError::TextureUpdate(_) => -4,
            SurfaceError::DeviceLost => -5,
            SurfaceError::EngineInit(_) => -6,
            SurfaceError::Disposed => -7,
            SurfaceError::InvalidUrl(_) => -8,
        }
    }
}
