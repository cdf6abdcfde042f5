//! synthroad - drive an endless synthwave road into the mountains.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use synthroad::cli::Args;
use synthroad::params::{RenderConfig, SceneParams};
use synthroad::rendering::GpuHost;
use synthroad::scene::Scene;
use synthroad::texture::ImageDecoder;

/// Main application state
struct App {
    // Configuration
    render_config: RenderConfig,
    scene_params: SceneParams,

    // Window and rendering
    window: Option<Arc<Window>>,
    host: Option<GpuHost>,
    scene: Option<Scene<GpuHost>>,
    loader: ImageDecoder,

    /// Startup or frame failure, reported once the event loop returns
    fatal_error: Option<anyhow::Error>,
}

impl App {
    fn new(args: &Args) -> Self {
        Self {
            render_config: args.render_config(),
            scene_params: args.scene_params(),
            window: None,
            host: None,
            scene: None,
            loader: ImageDecoder,
            fatal_error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("synthroad")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let mut host = pollster::block_on(GpuHost::new(Arc::clone(&window)))
            .context("failed to initialise GPU")?;

        let mut scene = Scene::new(
            self.scene_params.clone(),
            self.render_config.clone(),
            Instant::now(),
        );
        let size = window.inner_size();
        scene.resize(&mut host, size.width, size.height);
        scene.update_projection(size.width, size.height);

        log::info!("synthroad is running, press ESC to quit");

        self.window = Some(window);
        self.host = Some(host);
        self.scene = Some(scene);
        Ok(())
    }

    /// Render a single frame. A scene failure is permanent, so it ends the loop.
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.fatal_error.is_some() {
            return;
        }
        let (Some(host), Some(scene)) = (self.host.as_mut(), self.scene.as_mut()) else {
            return;
        };

        if let Err(err) = pollster::block_on(scene.draw(host, &self.loader, Instant::now())) {
            log::error!("Frame failed: {}", err);
            self.fatal_error = Some(anyhow::Error::new(err).context("failed to draw scene"));
            event_loop.exit();
            return;
        }

        match host.render_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => host.reconfigure(),
            Err(err) => log::error!("Render error: {:?}", err),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.fatal_error.is_some() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(err) = self.init(event_loop) {
            log::error!("{:#}", err);
            self.fatal_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(host), Some(scene)) = (self.host.as_mut(), self.scene.as_mut()) {
                    scene.resize(host, size.width, size.height);
                    scene.update_projection(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::info!("Starting synthroad ({}x{})", args.width, args.height);

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    match app.fatal_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
