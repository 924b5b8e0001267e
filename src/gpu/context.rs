//! GPU device setup for the shader renderer.

use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, Queue};

/// Errors raised while acquiring or using the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("Render target {width}x{height} exceeds the device limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },
    #[error("Buffer readback failed: {0}")]
    Readback(String),
}

/// Device and queue shared by the spark pipeline and its render targets.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Arc<Adapter>,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Acquire a headless device.
    ///
    /// Backends: Metal, Vulkan, GL. The device is opened with the adapter's
    /// own texture size limit so large export resolutions fit in one target.
    pub async fn new() -> Result<Self, GpuError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::METAL | wgpu::Backends::VULKAN | wgpu::Backends::GL,
            ..Default::default()
        });
        let adapter = headless_adapter(&instance).await?;
        let (device, queue) = open_device(&adapter).await?;
        log::info!(
            "Spark device ready, max target {}px",
            device.limits().max_texture_dimension_2d
        );

        Ok(Self {
            instance,
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Largest square render target this device accepts.
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Fail when a `width` x `height` target would exceed the device limit.
    pub fn check_texture_size(&self, width: u32, height: u32) -> Result<(), GpuError> {
        texture_fits(self.max_texture_size(), width, height)
    }
}

async fn headless_adapter(instance: &Instance) -> Result<Adapter, GpuError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        })
        .await
        .map_err(|_| GpuError::NoAdapter)?;
    let info = adapter.get_info();
    log::info!("Using GPU adapter {} ({:?})", info.name, info.backend);
    Ok(adapter)
}

async fn open_device(adapter: &Adapter) -> Result<(Device, Queue), GpuError> {
    let limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());
    let device = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("betspot-glow"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::default(),
        })
        .await?;
    Ok(device)
}

fn texture_fits(max: u32, width: u32, height: u32) -> Result<(), GpuError> {
    if width > max || height > max {
        return Err(GpuError::TextureTooLarge { width, height, max });
    }
    Ok(())
}
