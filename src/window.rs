//! The desktop host: a winit window driving a [`FrameLoop`].
//!
//! Decoding happens on a worker thread per load; results come back to the
//! event loop as a [`UserEvent`] and are applied there, so the frame loop
//! itself is only ever touched from one thread.

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::bitmap::Bitmap;
use crate::config::PortraitConfig;
use crate::error::{AppError, ImageError};
use crate::field::FieldMode;
use crate::gpu::GpuSurface;
use crate::input::Command;
use crate::loader::{load_bitmap, ImageSource, LoadTicket};
use crate::sampler::CanvasSize;
use crate::scheduler::{FrameLoop, LoadOutcome};
use crate::visuals::Theme;

const TITLE: &str = "Pixel Mosaic";

/// Everything needed to open a portrait window.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: ImageSource,
    pub config: PortraitConfig,
    pub theme: Theme,
    /// Directory snapshots are written to.
    pub snapshot_dir: PathBuf,
}

impl RunOptions {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            config: PortraitConfig::default(),
            theme: Theme::default(),
            snapshot_dir: PathBuf::from("."),
        }
    }

    pub fn with_config(mut self, config: PortraitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

/// Events sent to the event loop from worker threads.
#[derive(Debug)]
pub enum UserEvent {
    Loaded(LoadTicket, Result<Bitmap, ImageError>),
}

/// Open a window and run until it is closed.
pub fn run(options: RunOptions) -> Result<(), AppError> {
    options.config.validate()?;

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    source: ImageSource,
    snapshot_dir: PathBuf,
    proxy: EventLoopProxy<UserEvent>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuSurface>,
    frames: FrameLoop,
    title: String,
    /// Fatal error that ended the event loop early.
    error: Option<AppError>,
}

impl App {
    fn new(options: RunOptions, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            source: options.source,
            snapshot_dir: options.snapshot_dir,
            proxy,
            window: None,
            gpu: None,
            frames: FrameLoop::new(options.config, options.theme, CanvasSize::new(0.0, 0.0)),
            title: String::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    /// Decode the source image on a worker thread.
    fn start_load(&mut self) {
        let ticket = self.frames.begin_load();
        let source = self.source.clone();
        let proxy = self.proxy.clone();
        log::info!("Loading {}", source.describe());

        std::thread::spawn(move || {
            let result = pollster::block_on(load_bitmap(source));
            if proxy.send_event(UserEvent::Loaded(ticket, result)).is_err() {
                log::debug!("Event loop closed before load {} finished", ticket.generation());
            }
        });
    }

    fn handle_command(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        match command {
            Command::Reveal => {
                if self.frames.field().mode() == FieldMode::Disposed {
                    self.start_load();
                } else if self.frames.start_reveal() {
                    log::info!("Reveal started");
                }
            }
            Command::ToggleTheme => {
                let theme = self.frames.theme().toggled();
                self.frames.set_theme(theme);
                if let Some(gpu) = &mut self.gpu {
                    gpu.set_background(theme.background());
                }
                self.frames.show_status(format!("{} theme", theme.name()));
            }
            Command::Snapshot => self.save_snapshot(),
            Command::Reload => self.start_load(),
            Command::Quit => event_loop.exit(),
        }
    }

    fn save_snapshot(&mut self) {
        let path = self
            .snapshot_dir
            .join(format!("mosaic-{:06}.png", self.frames.time().frame()));
        match self.frames.snapshot().save_png(&path) {
            Ok(()) => {
                log::info!("Saved snapshot to {}", path.display());
                self.frames.show_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::warn!("Snapshot failed: {}", e);
                self.frames.show_status("Snapshot failed");
            }
        }
    }

    /// Mirror the status line into the window title.
    fn sync_title(&mut self) {
        let title = match self.frames.status() {
            Some(status) => format!("{} - {}", TITLE, status),
            None => TITLE.to_string(),
        };
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let size = window.inner_size();
        let background = self.frames.theme().background();
        match pollster::block_on(GpuSurface::new(window, background)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        self.frames.resize(CanvasSize::from(size));
        self.start_load();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Loaded(ticket, result) => {
                match self.frames.complete_load(ticket, result) {
                    LoadOutcome::Applied(count) => {
                        log::info!("Load {} applied: {} particles", ticket.generation(), count);
                    }
                    LoadOutcome::Stale | LoadOutcome::Failed(_) => {}
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.frames.pointer_mut().handle_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                if physical_size.width > 0 && physical_size.height > 0 {
                    self.frames.resize(CanvasSize::from(physical_size));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = Command::from_key_event(&event) {
                    self.handle_command(event_loop, command);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &mut self.gpu {
                    self.frames.tick(gpu);
                    match gpu.present() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                self.sync_title();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
