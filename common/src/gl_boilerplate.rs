use std::num::NonZeroU32;

use glium::{glutin::surface::WindowSurface, Display};
use winit::window::Window;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
  #[error("window has no native handle: {0}")]
  Handle(#[from] raw_window_handle::HandleError),
  #[error("window surface has zero size")]
  ZeroSize,
  #[error("no GL config matches the requested attributes")]
  NoConfig,
  #[error("glutin: {0}")]
  Glutin(#[from] glium::glutin::error::Error),
  #[error("incompatible OpenGL: {0}")]
  Incompatible(#[from] glium::IncompatibleOpenGl),
}

// glium's SimpleWindowBuilder can't turn on the debug callback through
// its public API.
pub fn init_display(
  window: &Window,
) -> Result<Display<WindowSurface>, ContextError> {
  use glium::{
    debug::DebugCallbackBehavior,
    glutin::{
      config::ConfigTemplateBuilder,
      context::NotCurrentGlContext as _,
      display::{DisplayApiPreference, GlDisplay as _},
      surface::SurfaceAttributesBuilder,
    },
  };
  use raw_window_handle::{HasDisplayHandle as _, HasWindowHandle as _};

  let display_handle = window.display_handle()?.as_raw();
  let window_handle = window.window_handle()?.as_raw();

  let disp = unsafe {
    glium::glutin::display::Display::new(
      display_handle,
      DisplayApiPreference::Egl,
    )?
  };

  log::info!("GL version: {}", disp.version_string());

  // the default framebuffer is drawn with depth testing
  let template = ConfigTemplateBuilder::new().with_depth_size(24).build();
  let config = unsafe { disp.find_configs(template)? }
    .next()
    .ok_or(ContextError::NoConfig)?;
  let context = unsafe { disp.create_context(&config, &Default::default())? };

  let size = window.inner_size();
  let width = NonZeroU32::new(size.width).ok_or(ContextError::ZeroSize)?;
  let height = NonZeroU32::new(size.height).ok_or(ContextError::ZeroSize)?;
  let surface_attr = SurfaceAttributesBuilder::<WindowSurface>::new().build(
    window_handle,
    width,
    height,
  );
  let surface = unsafe { disp.create_window_surface(&config, &surface_attr)? };
  let context = context.make_current(&surface)?;

  // GL errors are reported through the debug callback
  let display = Display::with_debug(
    context,
    surface,
    DebugCallbackBehavior::DebugMessageOnError,
  )?;
  Ok(display)
}
