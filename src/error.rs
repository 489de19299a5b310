//! Error types
//!
//! Failures that can surface while bringing up the window and GPU, plus the
//! recoverable backing-canvas allocation errors.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported texture format")]
    NoSurfaceFormat,

    #[error("cannot allocate a {width}x{height} backing canvas")]
    CanvasAllocation { width: u32, height: u32 },

    #[error("backing canvas must not be empty (got {width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
}
