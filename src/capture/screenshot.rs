//! Frame capture using the Windows Graphics Capture API.

use anyhow::{anyhow, Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use windows::core::Interface;
use windows::Foundation::TypedEventHandler;
use windows::Graphics::Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem};
use windows::Graphics::DirectX::DirectXPixelFormat;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11Resource, ID3D11Texture2D,
    D3D11_CPU_ACCESS_READ, D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_MAP_READ, D3D11_SDK_VERSION,
    D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
};
use windows::Win32::System::WinRT::Direct3D11::CreateDirect3D11DeviceFromDXGIDevice;
use windows::Win32::System::WinRT::Graphics::Capture::IGraphicsCaptureItemInterop;

use super::raster::RasterBuffer;
use super::window::{client_offset, window_info};

/// How long to wait for the compositor to deliver a frame.
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Captures the window's client area as an RGBA raster.
///
/// Creates a D3D11 device and a one-frame capture session, copies the frame
/// to a CPU-readable staging texture, crops away the title bar and borders
/// and swaps BGRA to RGBA.
pub fn capture_window_to_raster(hwnd: HWND) -> Result<RasterBuffer> {
    let client = window_info(hwnd)?;
    let offset = client_offset(hwnd)?;

    let (device, context) = create_d3d11_device()?;
    let item = create_capture_item(hwnd)?;
    let size = item.Size()?;

    let d3d_device = create_direct3d_device(&device)?;
    let frame_pool = Direct3D11CaptureFramePool::CreateFreeThreaded(
        &d3d_device,
        DirectXPixelFormat::B8G8R8A8UIntNormalized,
        1,
        size,
    )?;
    let session = frame_pool.CreateCaptureSession(&item)?;

    let frame_arrived = Arc::new(AtomicBool::new(false));
    let frame_arrived_clone = frame_arrived.clone();
    frame_pool.FrameArrived(&TypedEventHandler::new(
        move |_pool: &Option<Direct3D11CaptureFramePool>, _| {
            frame_arrived_clone.store(true, Ordering::SeqCst);
            Ok(())
        },
    ))?;

    session.StartCapture()?;

    let start = Instant::now();
    while !frame_arrived.load(Ordering::SeqCst) {
        if start.elapsed() > FRAME_TIMEOUT {
            let _ = session.Close();
            let _ = frame_pool.Close();
            return Err(anyhow!("Timeout waiting for frame"));
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let frame = frame_pool.TryGetNextFrame()?;
    let surface = frame.Surface()?;
    let access: windows::Win32::System::WinRT::Direct3D11::IDirect3DDxgiInterfaceAccess =
        surface.cast()?;
    let texture: ID3D11Texture2D = unsafe { access.GetInterface()? };

    let mut desc = D3D11_TEXTURE2D_DESC::default();
    unsafe { texture.GetDesc(&mut desc) };

    let staging_desc = D3D11_TEXTURE2D_DESC {
        Width: desc.Width,
        Height: desc.Height,
        MipLevels: 1,
        ArraySize: 1,
        Format: desc.Format,
        SampleDesc: desc.SampleDesc,
        Usage: D3D11_USAGE_STAGING,
        BindFlags: Default::default(),
        CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
        MiscFlags: Default::default(),
    };

    let staging_texture = unsafe {
        let mut staging: Option<ID3D11Texture2D> = None;
        device.CreateTexture2D(&staging_desc, None, Some(&mut staging))?;
        staging.ok_or_else(|| anyhow!("Failed to create staging texture"))?
    };
    let staging_resource = staging_texture.cast::<ID3D11Resource>()?;

    unsafe {
        context.CopyResource(&staging_resource, &texture.cast::<ID3D11Resource>()?);
    }

    let mapped = unsafe {
        let mut mapped = Default::default();
        context.Map(&staging_resource, 0, D3D11_MAP_READ, 0, Some(&mut mapped))?;
        mapped
    };

    let src_data = unsafe {
        std::slice::from_raw_parts(
            mapped.pData as *const u8,
            (mapped.RowPitch * desc.Height) as usize,
        )
    };
    let pixels = crop_bgra(
        src_data,
        mapped.RowPitch as usize,
        (desc.Width, desc.Height),
        (offset.x.max(0) as u32, offset.y.max(0) as u32),
        (client.width, client.height),
    );

    unsafe {
        context.Unmap(&staging_resource, 0);
    }
    session.Close()?;
    frame_pool.Close()?;

    RasterBuffer::from_raw(client.width, client.height, client.width as usize * 4, pixels)
}

/// Copies a client-area crop out of a BGRA frame as tightly packed RGBA.
///
/// Pixels outside the source frame stay transparent black.
fn crop_bgra(
    src: &[u8],
    row_pitch: usize,
    (src_width, src_height): (u32, u32),
    (crop_x, crop_y): (u32, u32),
    (width, height): (u32, u32),
) -> Vec<u8> {
    let mut out = vec![0u8; width as usize * height as usize * 4];
    for y in 0..height {
        let src_y = crop_y + y;
        if src_y >= src_height {
            break;
        }
        for x in 0..width {
            let src_x = crop_x + x;
            if src_x >= src_width {
                break;
            }
            let s = src_y as usize * row_pitch + src_x as usize * 4;
            let d = (y as usize * width as usize + x as usize) * 4;
            // BGRA -> RGBA
            out[d] = src[s + 2];
            out[d + 1] = src[s + 1];
            out[d + 2] = src[s];
            out[d + 3] = src[s + 3];
        }
    }
    out
}

/// Creates a Direct3D 11 device and immediate context.
fn create_d3d11_device() -> Result<(ID3D11Device, ID3D11DeviceContext)> {
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;

    unsafe {
        D3D11CreateDevice(
            None,
            D3D_DRIVER_TYPE_HARDWARE,
            None,
            D3D11_CREATE_DEVICE_BGRA_SUPPORT,
            None,
            D3D11_SDK_VERSION,
            Some(&mut device),
            None,
            Some(&mut context),
        )?;
    }

    Ok((
        device.ok_or_else(|| anyhow!("Failed to create D3D11 device"))?,
        context.ok_or_else(|| anyhow!("Failed to create D3D11 context"))?,
    ))
}

/// Wraps a D3D11 device for the WinRT capture API.
fn create_direct3d_device(
    device: &ID3D11Device,
) -> Result<windows::Graphics::DirectX::Direct3D11::IDirect3DDevice> {
    let dxgi_device: windows::Win32::Graphics::Dxgi::IDXGIDevice = device.cast()?;
    let inspectable = unsafe { CreateDirect3D11DeviceFromDXGIDevice(&dxgi_device)? };
    inspectable
        .cast()
        .context("Failed to cast to IDirect3DDevice")
}

fn create_capture_item(hwnd: HWND) -> Result<GraphicsCaptureItem> {
    let class_name = windows::core::h!("Windows.Graphics.Capture.GraphicsCaptureItem");
    let interop: IGraphicsCaptureItemInterop = unsafe {
        windows::Win32::System::WinRT::RoGetActivationFactory(class_name)
            .context("Failed to get IGraphicsCaptureItemInterop")?
    };
    unsafe {
        interop
            .CreateForWindow(hwnd)
            .context("Failed to create capture item for window")
    }
}
