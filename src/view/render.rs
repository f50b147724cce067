use crate::view::GpuContext;

/// Which backdrop to clear the frame with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Menu,
    Game,
    Paused,
}

pub fn clear_color(backdrop: Backdrop) -> wgpu::Color {
    match backdrop {
        Backdrop::Menu => wgpu::Color { r: 0.05, g: 0.05, b: 0.08, a: 1.0 },
        Backdrop::Game => wgpu::Color { r: 0.5, g: 0.8, b: 1.0, a: 1.0 },
        Backdrop::Paused => wgpu::Color { r: 0.25, g: 0.4, b: 0.5, a: 1.0 },
    }
}

/// Clears the surface and draws the egui output on top.
pub struct FrameRenderer {
    egui_renderer: egui_wgpu::Renderer,
}

impl FrameRenderer {
    pub fn new(gpu: &GpuContext) -> Self {
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );
        Self { egui_renderer }
    }

    pub fn render(
        &mut self,
        gpu: &GpuContext,
        egui_ctx: &egui::Context,
        shapes: Vec<egui::epaint::ClippedShape>,
        textures_delta: egui::TexturesDelta,
        pixels_per_point: f32,
        backdrop: Backdrop,
    ) -> Result<(), wgpu::SurfaceError> {
        let output = gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point,
        };
        let primitives = egui_ctx.tessellate(shapes, pixels_per_point);

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(&gpu.device, &gpu.queue, &mut encoder, &primitives, &screen_descriptor);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(backdrop)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
