#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn web_surface_abi_version() -> u32 {
    super::WEB_SURFACE_ABI_VERSION
}
