//! ### English
//! Software GPU devices for tests: real texel storage with GL unpack and D3D11 box semantics.
//!
//! ### 中文
//! 测试用软件 GPU 设备：带真实像素存储，并模拟 GL unpack 与 D3D11 box 语义。
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::d3d11::D3D11TextureApi;
use super::draw_list::TextureId;
use super::gl::GlTextureApi;
use crate::engine::error::SurfaceError;
use crate::engine::frame::{BYTES_PER_PIXEL, DirtyRect};

struct SoftTexture {
    width: u32,
    height: u32,
    format: i32,
    texels: Vec<u8>,
}

impl SoftTexture {
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut out = [0; 4];
        out.copy_from_slice(&self.texels[at..at + BYTES_PER_PIXEL]);
        out
    }

    /// ### English
    /// Writes a `width × height` block at `(x, y)`; source row `r` starts at `start + r * pitch`.
    ///
    /// ### 中文
    /// 在 `(x, y)` 写入 `width × height` 块；源第 `r` 行起始于 `start + r * pitch`。
    fn write_block(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        source: &[u8],
        start: usize,
        pitch: usize,
    ) {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        for row in 0..height as usize {
            let src = start + row * pitch;
            let dst = ((y as usize + row) * self.width as usize + x as usize) * BYTES_PER_PIXEL;
            self.texels[dst..dst + row_bytes].copy_from_slice(&source[src..src + row_bytes]);
        }
    }
}

#[derive(Default)]
struct GlState {
    textures: HashMap<u32, SoftTexture>,
    next_name: u32,
    bound: u32,
    row_length: i32,
    skip_pixels: i32,
    skip_rows: i32,
    error: u32,
    fail_next_image: bool,
    fail_next_sub_image: bool,
    created: usize,
    deleted: usize,
}

/// ### English
/// Software OpenGL texture device (cheap to clone; clones share state).
///
/// ### 中文
/// 软件 OpenGL 纹理设备（clone 代价低，clone 之间共享状态）。
#[derive(Clone, Default)]
pub(crate) struct SoftwareGl {
    state: Rc<RefCell<GlState>>,
}

impl SoftwareGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pixel(&self, texture: u32, x: u32, y: u32) -> [u8; 4] {
        self.state.borrow().textures[&texture].pixel(x, y)
    }

    pub(crate) fn texture_size(&self, texture: u32) -> Option<(u32, u32)> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .map(|texture| (texture.width, texture.height))
    }

    pub(crate) fn internal_format(&self, texture: u32) -> Option<i32> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .map(|texture| texture.format)
    }

    pub(crate) fn unpack_state(&self) -> (i32, i32, i32) {
        let state = self.state.borrow();
        (state.row_length, state.skip_pixels, state.skip_rows)
    }

    pub(crate) fn fail_next_image(&self) {
        self.state.borrow_mut().fail_next_image = true;
    }

    pub(crate) fn fail_next_sub_image(&self) {
        self.state.borrow_mut().fail_next_sub_image = true;
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub(crate) fn created_count(&self) -> usize {
        self.state.borrow().created
    }

    pub(crate) fn deleted_count(&self) -> usize {
        self.state.borrow().deleted
    }
}

impl GlState {
    fn source_layout(&self, width: i32) -> (usize, usize) {
        let row_length = if self.row_length > 0 {
            self.row_length as usize
        } else {
            width as usize
        };
        let pitch = row_length * BYTES_PER_PIXEL;
        let start = self.skip_rows as usize * pitch + self.skip_pixels as usize * BYTES_PER_PIXEL;
        (start, pitch)
    }
}

impl GlTextureApi for SoftwareGl {
    fn create_texture(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        state.next_name += 1;
        Ok(state.next_name)
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        if state.textures.remove(&texture).is_some() {
            state.deleted += 1;
        }
        if state.bound == texture {
            state.bound = 0;
        }
    }

    fn bind_texture(&self, texture: u32) {
        self.state.borrow_mut().bound = texture;
    }

    fn pixel_store(&self, pname: u32, value: i32) {
        let mut state = self.state.borrow_mut();
        match pname {
            glow::UNPACK_ROW_LENGTH => state.row_length = value,
            glow::UNPACK_SKIP_PIXELS => state.skip_pixels = value,
            glow::UNPACK_SKIP_ROWS => state.skip_rows = value,
            _ => {}
        }
    }

    fn tex_parameter(&self, _pname: u32, _value: i32) {}

    fn tex_image_2d(&self, internal_format: i32, width: i32, height: i32, pixels: &[u8]) {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_image) || state.bound == 0 {
            state.error = glow::OUT_OF_MEMORY;
            return;
        }
        let (start, pitch) = state.source_layout(width);
        let mut texture = SoftTexture {
            width: width as u32,
            height: height as u32,
            format: internal_format,
            texels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        };
        texture.write_block(0, 0, width as u32, height as u32, pixels, start, pitch);
        let bound = state.bound;
        state.textures.insert(bound, texture);
        state.created += 1;
    }

    fn tex_sub_image_2d(&self, x: i32, y: i32, width: i32, height: i32, pixels: &[u8]) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if std::mem::take(&mut state.fail_next_sub_image) {
            state.error = glow::INVALID_OPERATION;
            return;
        }
        let (start, pitch) = state.source_layout(width);
        let bound = state.bound;
        match state.textures.get_mut(&bound) {
            Some(texture) => texture.write_block(
                x as u32,
                y as u32,
                width as u32,
                height as u32,
                pixels,
                start,
                pitch,
            ),
            None => state.error = glow::INVALID_OPERATION,
        }
    }

    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.borrow_mut().error, glow::NO_ERROR)
    }
}

struct SoftD3DTexture {
    texture: SoftTexture,
    srgb: bool,
}

#[derive(Default)]
struct D3DState {
    textures: HashMap<TextureId, SoftD3DTexture>,
    released: HashSet<TextureId>,
    next_id: u64,
    removed: bool,
    fail_next_create: bool,
    last_update: Option<(TextureId, DirtyRect, u32)>,
}

/// ### English
/// Software Direct3D 11 device (cheap to clone; clones share state).
///
/// ### 中文
/// 软件 Direct3D 11 设备（clone 代价低，clone 之间共享状态）。
#[derive(Clone, Default)]
pub(crate) struct SoftwareD3D11 {
    state: Rc<RefCell<D3DState>>,
}

impl SoftwareD3D11 {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pixel(&self, texture: TextureId, x: u32, y: u32) -> [u8; 4] {
        self.state.borrow().textures[&texture].texture.pixel(x, y)
    }

    pub(crate) fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .map(|live| (live.texture.width, live.texture.height))
    }

    pub(crate) fn is_srgb(&self, texture: TextureId) -> bool {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .is_some_and(|live| live.srgb)
    }

    pub(crate) fn is_released(&self, texture: TextureId) -> bool {
        self.state.borrow().released.contains(&texture)
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub(crate) fn last_update(&self) -> Option<(TextureId, DirtyRect, u32)> {
        self.state.borrow().last_update
    }

    pub(crate) fn remove_device(&self) {
        self.state.borrow_mut().removed = true;
    }

    pub(crate) fn restore_device(&self) {
        self.state.borrow_mut().removed = false;
    }

    pub(crate) fn fail_next_create(&self) {
        self.state.borrow_mut().fail_next_create = true;
    }
}

impl D3D11TextureApi for SoftwareD3D11 {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        row_pitch: u32,
        srgb: bool,
    ) -> Result<TextureId, SurfaceError> {
        let mut state = self.state.borrow_mut();
        if state.removed || std::mem::take(&mut state.fail_next_create) {
            return Err(SurfaceError::TextureCreation(
                "CreateTexture2D: DXGI_ERROR_DEVICE_REMOVED".to_string(),
            ));
        }
        let mut texture = SoftTexture {
            width,
            height,
            format: 0,
            texels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        };
        texture.write_block(0, 0, width, height, pixels, 0, row_pitch as usize);

        state.next_id += 1;
        let id = TextureId(0x1000 + state.next_id);
        state.textures.insert(id, SoftD3DTexture { texture, srgb });
        Ok(id)
    }

    fn update_region(
        &self,
        texture: TextureId,
        rect: DirtyRect,
        source: &[u8],
        row_pitch: u32,
    ) -> Result<(), SurfaceError> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.last_update = Some((texture, rect, row_pitch));
        if state.removed {
            // UpdateSubresource reports nothing; removal is seen through the device.
            return Ok(());
        }
        let Some(live) = state.textures.get_mut(&texture) else {
            return Err(SurfaceError::TextureUpdate(format!(
                "unknown texture {texture:?}"
            )));
        };
        live.texture.write_block(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            source,
            0,
            row_pitch as usize,
        );
        Ok(())
    }

    fn release_texture(&self, texture: TextureId) {
        let mut state = self.state.borrow_mut();
        if state.textures.remove(&texture).is_some() {
            state.released.insert(texture);
        }
    }

    fn device_removed(&self) -> bool {
        self.state.borrow().removed
    }
}
