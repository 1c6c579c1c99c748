//! ### English
//! `D3D11TextureApi` over the host's `ID3D11Device` / immediate `ID3D11DeviceContext`.
//!
//! ### 中文
//! 基于宿主 `ID3D11Device` / 立即上下文 `ID3D11DeviceContext` 的 `D3D11TextureApi` 实现。
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;

use windows::Win32::Graphics::Direct3D11::{
    D3D11_BIND_SHADER_RESOURCE, D3D11_BOX, D3D11_SUBRESOURCE_DATA, D3D11_TEXTURE2D_DESC,
    D3D11_USAGE_DEFAULT, ID3D11Device, ID3D11DeviceContext, ID3D11ShaderResourceView,
    ID3D11Texture2D,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_FORMAT_B8G8R8A8_UNORM_SRGB, DXGI_SAMPLE_DESC,
};
use windows::core::Interface;

use super::D3D11TextureApi;
use crate::engine::error::SurfaceError;
use crate::engine::frame::DirtyRect;
use crate::engine::rendering::draw_list::TextureId;

struct LiveTexture {
    texture: ID3D11Texture2D,
    // Kept alive for as long as the id it backs is in a draw list.
    _view: ID3D11ShaderResourceView,
}

/// ### English
/// Host device + immediate context. Textures live here until released.
///
/// ### 中文
/// 宿主设备与立即上下文；纹理在此存活直至被释放。
pub struct D3D11Device {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
    textures: RefCell<HashMap<TextureId, LiveTexture>>,
}

impl D3D11Device {
    pub fn new(device: ID3D11Device, context: ID3D11DeviceContext) -> Self {
        Self {
            device,
            context,
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// ### English
    /// Wraps raw COM pointers supplied by the host (adds a reference to each).
    ///
    /// # Safety
    /// Both pointers must be live `ID3D11Device` / `ID3D11DeviceContext` interfaces.
    ///
    /// ### 中文
    /// 包装宿主提供的原始 COM 指针（各增加一次引用）。
    ///
    /// # Safety
    /// 两个指针必须分别是存活的 `ID3D11Device` / `ID3D11DeviceContext` 接口。
    pub unsafe fn from_raw(device: *mut c_void, context: *mut c_void) -> Option<Self> {
        let device = unsafe { ID3D11Device::from_raw_borrowed(&device) }?.clone();
        let context = unsafe { ID3D11DeviceContext::from_raw_borrowed(&context) }?.clone();
        Some(Self::new(device, context))
    }
}

impl D3D11TextureApi for D3D11Device {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
        row_pitch: u32,
        srgb: bool,
    ) -> Result<TextureId, SurfaceError> {
        let desc = D3D11_TEXTURE2D_DESC {
            Width: width,
            Height: height,
            MipLevels: 1,
            ArraySize: 1,
            Format: if srgb {
                DXGI_FORMAT_B8G8R8A8_UNORM_SRGB
            } else {
                DXGI_FORMAT_B8G8R8A8_UNORM
            },
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_SHADER_RESOURCE.0 as u32,
            CPUAccessFlags: 0,
            MiscFlags: 0,
        };
        let initial = D3D11_SUBRESOURCE_DATA {
            pSysMem: pixels.as_ptr().cast(),
            SysMemPitch: row_pitch,
            SysMemSlicePitch: 0,
        };

        let mut texture = None;
        unsafe {
            self.device
                .CreateTexture2D(&desc, Some(&initial), Some(&mut texture))
        }
        .map_err(|err| SurfaceError::TextureCreation(format!("CreateTexture2D: {err}")))?;
        let texture = texture.ok_or_else(|| {
            SurfaceError::TextureCreation("CreateTexture2D returned no texture".to_string())
        })?;

        let mut view = None;
        unsafe {
            self.device
                .CreateShaderResourceView(&texture, None, Some(&mut view))
        }
        .map_err(|err| {
            SurfaceError::TextureCreation(format!("CreateShaderResourceView: {err}"))
        })?;
        let view = view.ok_or_else(|| {
            SurfaceError::TextureCreation("CreateShaderResourceView returned no view".to_string())
        })?;

        let id = TextureId(view.as_raw() as usize as u64);
        self.textures.borrow_mut().insert(
            id,
            LiveTexture {
                texture,
                _view: view,
            },
        );
        Ok(id)
    }

    fn update_region(
        &self,
        texture: TextureId,
        rect: DirtyRect,
        source: &[u8],
        row_pitch: u32,
    ) -> Result<(), SurfaceError> {
        let textures = self.textures.borrow();
        let Some(live) = textures.get(&texture) else {
            return Err(SurfaceError::TextureUpdate(format!(
                "unknown texture {texture:?}"
            )));
        };

        let region = D3D11_BOX {
            left: rect.x,
            top: rect.y,
            front: 0,
            right: rect.x + rect.width,
            bottom: rect.y + rect.height,
            back: 1,
        };
        unsafe {
            self.context.UpdateSubresource(
                &live.texture,
                0,
                Some(&region),
                source.as_ptr().cast(),
                row_pitch,
                0,
            );
        }
        Ok(())
    }

    fn release_texture(&self, texture: TextureId) {
        self.textures.borrow_mut().remove(&texture);
    }

    fn device_removed(&self) -> bool {
        unsafe { self.device.GetDeviceRemovedReason() }.is_err()
    }
}
