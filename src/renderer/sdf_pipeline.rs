//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::platform::StartupError;
use crate::settings::Settings;
use crate::snapshot::{RenderSink, RenderSnapshot, SpriteKind};

/// Maximum number of sprites drawn per frame
const MAX_SPRITES: usize = 64;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    world_size: [f32; 2], // offset 8
    time: f32,            // offset 16
    wall_offset: f32,     // offset 20
    sprite_count: u32,    // offset 24
    dead: u32,            // offset 28
    high_contrast: u32,   // offset 32
    speed: f32,           // offset 36
    _pad: [u32; 2],       // pad to 48 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SpriteData {
    pos: [f32; 2],
    radius: f32,
    angle: f32,
    kind: u32,    // 0=Player, 1=Rock, 2=Clock
    variant: u32, // Rock variant 1-3
    _pad: [u32; 2],
}

impl SpriteData {
    const EMPTY: Self = Self {
        pos: [0.0; 2],
        radius: 0.0,
        angle: 0.0,
        kind: 0,
        variant: 0,
        _pad: [0; 2],
    };
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    sprites_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
    settings: Settings,
}

impl SdfRenderState {
    /// Build the device, surface config and pipeline. This is the readiness
    /// gate: the game loop does not start until it resolves.
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| StartupError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| StartupError::Surface("no supported surface format".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or_else(|| StartupError::Surface("no supported alpha mode".into()))?;

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                world_size: [WIDTH, HEIGHT],
                time: 0.0,
                wall_offset: 0.0,
                sprite_count: 0,
                dead: 0,
                high_contrast: 0,
                speed: 0.0,
                _pad: [0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sprites_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprites"),
            size: (std::mem::size_of::<SpriteData>() * MAX_SPRITES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: sprites_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            sprites_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
            settings: Settings::default(),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    /// Update GPU buffers from the frame snapshot and render
    pub fn render(&mut self, frame: &RenderSnapshot, time: f64) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame, convert to seconds
        let elapsed = ((time - self.start_time) / 1000.0) as f32;
        let animate = self.settings.animate_scenery();

        let sprite_count = frame.sprites.len().min(MAX_SPRITES);
        if frame.sprites.len() > MAX_SPRITES {
            log::warn!(
                "Dropping {} sprites over the {} limit",
                frame.sprites.len() - MAX_SPRITES,
                MAX_SPRITES
            );
        }

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            world_size: [WIDTH, HEIGHT],
            time: elapsed,
            wall_offset: if animate { frame.wall_offset } else { 0.0 },
            sprite_count: sprite_count as u32,
            dead: frame.dead as u32,
            high_contrast: self.settings.high_contrast as u32,
            speed: frame.speed,
            _pad: [0; 2],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let mut sprites_data = vec![SpriteData::EMPTY; MAX_SPRITES];
        for (slot, sprite) in sprites_data.iter_mut().zip(&frame.sprites) {
            let (kind, variant) = match sprite.kind {
                SpriteKind::Player => (0, 0),
                SpriteKind::Rock(variant) => (1, variant as u32),
                SpriteKind::Clock => (2, 0),
            };
            *slot = SpriteData {
                pos: [sprite.pos.x, sprite.pos.y],
                radius: sprite.radius,
                angle: if animate { sprite.angle } else { 0.0 },
                kind,
                variant,
                _pad: [0; 2],
            };
        }
        self.queue
            .write_buffer(&self.sprites_buffer, 0, bytemuck::cast_slice(&sprites_data));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl RenderSink for SdfRenderState {
    type Error = wgpu::SurfaceError;

    fn present(&mut self, frame: &RenderSnapshot, time: f64) -> Result<(), Self::Error> {
        match self.render(frame, time) {
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and skip this frame
                self.resize(self.size.0, self.size.1);
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_struct_layout() {
        // Uniform buffers need 16-byte multiples; sizes must match the WGSL
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<SpriteData>(), 32);
    }
}
