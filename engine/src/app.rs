use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::raster::{Raster, RasterSize};

pub struct AppConfig {
    pub title: String,
    pub logical_size: RasterSize,
    pub vsync: bool,
    pub tick_interval: Duration,
}

impl AppConfig {
    pub fn new(title: impl Into<String>, logical_size: RasterSize) -> Self {
        Self {
            title: title.into(),
            logical_size,
            vsync: true,
            // 60 Hz fixed tick.
            tick_interval: Duration::from_micros(16_667),
        }
    }
}

/// A windowed application driven at a fixed tick.
///
/// The framebuffer keeps the configured logical size regardless of window
/// resizes; `pixels` scales it to the surface. That way simulation bounds and
/// pixel coordinates stay stable for the whole run.
pub trait WindowApp: 'static {
    /// Key press/release. Return `false` to request shutdown.
    fn handle_key(&mut self, key: VirtualKeyCode, pressed: bool) -> bool;

    /// One fixed-tick simulation step. Return `false` to request shutdown.
    fn tick(&mut self, dt: Duration) -> bool;

    fn draw(&mut self, raster: &mut Raster<'_>);

    /// Called once when the event loop shuts down, before the process exits.
    fn on_exit(&mut self) {}
}

pub fn run_app<A: WindowApp>(config: AppConfig, mut app: A) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let size = config.logical_size;
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(PhysicalSize::new(size.width, size.height))
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let mut pixels: Pixels = PixelsBuilder::new(size.width, size.height, surface_texture)
        .enable_vsync(config.vsync)
        .build()?;

    let tick_interval = config.tick_interval;
    let mut last_tick = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width > 0 && new_size.height > 0 {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            eprintln!("surface resize failed: {err}");
                        }
                    }
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    let pressed = *state == ElementState::Pressed;
                    if !app.handle_key(*key, pressed) {
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                // Frame limiter: only redraw once the tick interval elapsed.
                if last_tick.elapsed() >= tick_interval {
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_tick);
                last_tick = now;

                if !app.tick(dt) {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                let mut raster = Raster::new(pixels.frame_mut(), size);
                app.draw(&mut raster);
                if let Err(err) = pixels.render() {
                    eprintln!("present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                app.on_exit();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
