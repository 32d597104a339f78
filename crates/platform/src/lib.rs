//! Platform layer: window, event loop and input-to-scene wiring.
//!
//! Design goals:
//! - Redraws come from a fixed-interval deadline, not a busy loop.
//! - Proper handling of resize/close; lost surfaces are recreated.
//! - No globals: everything the callbacks touch lives in the `App`
//!   context owned by the event loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use asset::mesh::MeshData;
use corelib::orbit;
use corelib::scene::{MeshId, Scene};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Redraw cadence. The deadline timer re-arms itself after each firing;
/// no frame-time measurement, no catch-up, a late frame just re-arms.
const FRAME_INTERVAL: Duration = Duration::from_millis(25);

/// Window + GPU configuration handed over by the binary.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
}

/// Application context: scene, mesh registry and, once the event loop has
/// resumed, the window and GPU state. Constructed at startup, torn down
/// when the event loop returns.
struct App {
    config: RunConfig,
    scene: Scene,
    meshes: Vec<MeshData>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    next_frame: Instant,
}

impl App {
    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let items = self.scene.draw_list();
        let projection = self.scene.camera().projection();
        match gpu.render(projection, &items) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("surface lost/outdated, recreating");
                gpu.recreate_surface();
            }
            Err(err) => log::error!("render error: {err:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );
        let size = window.inner_size();
        log::info!("window created: {}x{}", size.width, size.height);

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends));
        // Ids were assigned at registration time in this same order.
        for (i, mesh) in self.meshes.iter().enumerate() {
            let id = gpu.upload_mesh(mesh);
            debug_assert_eq!(id, MeshId(i as u32));
        }

        self.scene.camera_mut().resize(size.width, size.height);
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.next_frame = Instant::now() + FRAME_INTERVAL;
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame = Instant::now() + FRAME_INTERVAL;
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, exiting event loop");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape))
                {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::info!("resized: {width}x{height}");
                self.scene.camera_mut().resize(width, height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(width, height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                // Absolute orbit: the cursor position alone sets the angles.
                let camera = self.scene.camera();
                let rotation = orbit::rotation_for_cursor(
                    position.x as f32,
                    position.y as f32,
                    camera.width() as f32,
                    camera.height() as f32,
                );
                self.scene.camera_transform_mut().rotation_deg = rotation;
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

/// Run the viewer until the window closes. `meshes` must be in [`MeshId`]
/// registration order; they are uploaded once the GPU is up.
pub fn run(config: RunConfig, scene: Scene, meshes: Vec<MeshData>) -> Result<()> {
    let event_loop: EventLoop<()> =
        EventLoop::new().map_err(|e| anyhow::anyhow!("Failed to create event loop: {e}"))?;
    let mut app = App {
        config,
        scene,
        meshes,
        window: None,
        gpu: None,
        next_frame: Instant::now(),
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    Ok(())
}
