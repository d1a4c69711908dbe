use std::collections::HashSet;
use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// Keyboard state for one update tick.
///
/// `keys_down` is the currently-held set; `keys_pressed`/`keys_released` are
/// the edge transitions since the previous tick and are cleared after each
/// update.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub keys_down: HashSet<VirtualKeyCode>,
    pub keys_pressed: HashSet<VirtualKeyCode>,
    pub keys_released: HashSet<VirtualKeyCode>,
}

impl InputFrame {
    pub fn is_down(&self, key: VirtualKeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn was_pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn clear_edges(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    fn record(&mut self, key: VirtualKeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }
}

pub trait GameShell {
    fn update(&mut self, input: &InputFrame, dt: Duration, ctx: &mut AppContext);
    fn render(&mut self, gfx: &mut dyn Renderer2d);

    fn wants_exit(&self) -> bool {
        false
    }
}

pub fn run_shell<S: GameShell + 'static>(
    config: AppConfig,
    mut shell: S,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);

    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut pixels_builder =
        PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
    if let Some(vsync) = config.vsync {
        pixels_builder = pixels_builder.enable_vsync(vsync);
    }
    let pixels: Pixels = pixels_builder.build()?;

    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();

    // winit 0.28's run() never returns; the process exits from inside the
    // event loop.
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    ctx.surface_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(ctx.surface_size) {
                        eprintln!("resize failed: {err}");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    input.record(*key, *state);
                }
                WindowEvent::Focused(false) => {
                    // Dropped key-up events while unfocused would wedge held state.
                    input.keys_down.clear();
                    input.clear_edges();
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                shell.update(&input, dt, &mut ctx);
                input.clear_edges();

                if shell.wants_exit() {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                let draw_res = ctx.renderer.draw_frame(|gfx| {
                    shell.render(gfx);
                });
                if let Err(err) = draw_res {
                    eprintln!("draw failed: {err}");
                }
                if let Err(err) = ctx.renderer.present() {
                    eprintln!("present failed: {err}");
                }
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    })
}
