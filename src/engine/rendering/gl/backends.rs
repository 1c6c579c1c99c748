//! ### English
//! `GlTextureApi` over the gleam bindings resolved from the host context.
//!
//! ### 中文
//! 基于从宿主上下文解析出的 gleam 绑定实现 `GlTextureApi`。
use std::rc::Rc;

use gleam::gl::Gl;

use super::GlTextureApi;

/// ### English
/// gleam GL API wrapper (the binding WebRender-style hosts already hold as `Rc<dyn Gl>`).
///
/// ### 中文
/// gleam GL API 封装（WebRender 风格的宿主通常已持有 `Rc<dyn Gl>`）。
pub struct GleamTextureApi {
    gl: Rc<dyn Gl>,
}

impl GleamTextureApi {
    pub fn new(gl: Rc<dyn Gl>) -> Self {
        Self { gl }
    }
}

impl GlTextureApi for GleamTextureApi {
    fn create_texture(&self) -> Result<u32, String> {
        match self.gl.gen_textures(1).first() {
            Some(&name) if name != 0 => Ok(name),
            _ => Err("glGenTextures returned no texture".to_string()),
        }
    }

    fn delete_texture(&self, texture: u32) {
        if texture != 0 {
            self.gl.delete_textures(&[texture]);
        }
    }

    fn bind_texture(&self, texture: u32) {
        self.gl.bind_texture(glow::TEXTURE_2D, texture);
    }

    fn pixel_store(&self, pname: u32, value: i32) {
        self.gl.pixel_store_i(pname, value);
    }

    fn tex_parameter(&self, pname: u32, value: i32) {
        self.gl.tex_parameter_i(glow::TEXTURE_2D, pname, value);
    }

    fn tex_image_2d(&self, internal_format: i32, width: i32, height: i32, pixels: &[u8]) {
        self.gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            internal_format,
            width,
            height,
            0,
            glow::BGRA,
            glow::UNSIGNED_BYTE,
            Some(pixels),
        );
    }

    fn tex_sub_image_2d(&self, x: i32, y: i32, width: i32, height: i32, pixels: &[u8]) {
        self.gl.tex_sub_image_2d(
            glow::TEXTURE_2D,
            0,
            x,
            y,
            width,
            height,
            glow::BGRA,
            glow::UNSIGNED_BYTE,
            pixels,
        );
    }

    fn get_error(&self) -> u32 {
        self.gl.get_error()
    }
}
