use std::path::Path;
use std::time::Instant;

use anyhow::Context as _;
use winit::{
  application::ApplicationHandler,
  dpi::{LogicalSize, PhysicalSize},
  event::{KeyEvent, WindowEvent},
  event_loop::{ActiveEventLoop, EventLoop},
  keyboard::{Key, NamedKey},
  window::{Window, WindowAttributes, WindowId},
};

use path_tracing_stage::{
  Animation, Config, FrameScheduler, GliumBackend, GraphicsContext,
  ObjectKind, Scene,
};

type Result<T> = anyhow::Result<T>;
type Context = GraphicsContext<GliumBackend>;

const SPEED_STEP: f32 = 5.0;

/// Animation frame requests, forwarded to the window as redraw requests
/// once the event loop runs dry.
#[derive(Debug, Default)]
struct FrameRequests {
  pending: bool,
  due: bool,
}

impl FrameScheduler for FrameRequests {
  fn request_frame(&mut self) {
    self.pending = true;
  }
}

/// Runs `f` between `begin_frame` and `finish_frame`. The frame is
/// presented even if `f` fails.
fn in_frame<T>(
  ctx: &mut Context,
  f: impl FnOnce(&mut Context) -> path_tracing_stage::Result<T>,
) -> path_tracing_stage::Result<T> {
  ctx.begin_frame()?;
  let result = f(ctx);
  let finished = ctx.finish_frame();
  let value = result?;
  finished?;
  Ok(value)
}

struct World {
  ctx: Context,
  scene: Scene<GliumBackend>,
  animation: Animation,
  requests: FrameRequests,
}

impl World {
  fn new(window: &Window, config: &Config) -> Result<Self> {
    let display = common::init_display(window)?;
    let mut ctx = GraphicsContext::new(GliumBackend::new(display));
    let mut scene = Scene::new(&mut ctx, config)?;

    in_frame(&mut ctx, |ctx| scene.draw(ctx)).context("first frame failed")?;

    let animation =
      Animation::for_scene(&scene, config.speed_degrees_per_second);
    let mut world = Self {
      ctx,
      scene,
      animation,
      requests: FrameRequests::default(),
    };
    if config.start_animation {
      world.animation.start(&mut world.requests);
    }
    Ok(world)
  }

  fn redraw(&mut self, now: Instant) -> path_tracing_stage::Result<()> {
    let Self {
      ctx,
      scene,
      animation,
      requests,
    } = self;
    let due = std::mem::take(&mut requests.due);

    in_frame(ctx, |ctx| {
      if due && animation.tick(now, scene, ctx, requests)? {
        return Ok(());
      }
      scene.draw_at(ctx, now)
    })
  }

  fn toggle_animation(&mut self) {
    if self.animation.is_running() {
      self.animation.stop();
    } else {
      self.animation.start(&mut self.requests);
    }
  }

  fn change_speed(&mut self, speed: f32) {
    self.animation.speed_degrees_per_second = speed;
    log::info!("speed set to {} deg/s", speed);
  }

  fn reload_shaders(&mut self, dir: &Path) {
    match self.scene.reload_shaders(&mut self.ctx, dir) {
      Ok(()) => log::info!("reloaded shaders from {}", dir.display()),
      Err(e) => log::warn!("shader reload incomplete: {}", e),
    }
  }

  fn status(&self) -> String {
    let objects = self
      .scene
      .draw_options
      .enabled()
      .map(ObjectKind::name)
      .collect::<Vec<_>>();
    let state = if self.animation.is_running() {
      "running"
    } else {
      "stopped"
    };

    format!(
      "{} deg/s, {} - [{}]",
      self.animation.speed_degrees_per_second,
      state,
      objects.join(", ")
    )
  }
}

struct App {
  config: Config,
  // dropped before the window it renders into
  world: Option<World>,
  window: Option<Window>,
  setup_error: Option<anyhow::Error>,
}

impl App {
  fn new(config: Config) -> Self {
    Self {
      config,
      world: None,
      window: None,
      setup_error: None,
    }
  }

  fn handle_init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
    let (width, height) = self.config.window_size;
    let window_attrs = WindowAttributes::default()
      .with_title(self.config.window_title.clone())
      .with_inner_size(LogicalSize::new(width, height));

    let window = event_loop
      .create_window(window_attrs)
      .context("failed to create window")?;
    let world = World::new(&window, &self.config)?;

    self.world = Some(world);
    self.window = Some(window);
    self.update_title();
    Ok(())
  }

  fn handle_resize(&mut self, size: PhysicalSize<u32>) {
    log::debug!("resized to {:?}", size);
    if let Some(world) = &self.world {
      world.ctx.backend().resize((size.width, size.height));
    }
    self.request_redraw();
  }

  fn handle_keyboard(&mut self, event: KeyEvent, event_loop: &ActiveEventLoop) {
    if !event.state.is_pressed() {
      return;
    }
    if event.logical_key == NamedKey::Escape {
      event_loop.exit();
      return;
    }
    let Some(world) = self.world.as_mut() else {
      return;
    };

    match event.logical_key.as_ref() {
      Key::Named(NamedKey::Space) => world.toggle_animation(),
      Key::Named(NamedKey::F5) => world.reload_shaders(&self.config.shader_dir),
      Key::Character("+" | "=") => {
        world.change_speed(world.animation.speed_degrees_per_second + SPEED_STEP)
      }
      Key::Character("-") => {
        world.change_speed(world.animation.speed_degrees_per_second - SPEED_STEP)
      }
      Key::Character("0") => world.change_speed(0.0),
      Key::Character(c) => {
        let kind = c
          .parse::<usize>()
          .ok()
          .and_then(|n| n.checked_sub(1))
          .and_then(|i| ObjectKind::ALL.get(i).copied());
        let Some(kind) = kind else {
          return;
        };
        let enabled = world.scene.draw_options.toggle(kind);
        log::info!("{} {}", kind, if enabled { "shown" } else { "hidden" });
      }
      _ => return,
    }

    self.update_title();
    self.request_redraw();
  }

  fn handle_redraw(&mut self) {
    let Some(world) = self.world.as_mut() else {
      return;
    };

    if let Err(e) = world.redraw(Instant::now()) {
      log::error!("frame failed: {}", e);
      world.animation.stop();
      self.update_title();
    }
  }

  fn update_title(&self) {
    if let (Some(window), Some(world)) = (&self.window, &self.world) {
      window.set_title(&format!(
        "{} - {}",
        self.config.window_title,
        world.status()
      ));
    }
  }

  fn request_redraw(&self) {
    if let Some(window) = self.window.as_ref() {
      window.request_redraw();
    }
  }
}

impl ApplicationHandler for App {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.window.is_some() {
      return;
    }

    if let Err(e) = self.handle_init(event_loop) {
      log::error!("setup failed: {:#}", e);
      self.setup_error = Some(e);
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
      WindowEvent::Resized(size) => self.handle_resize(size),
      WindowEvent::KeyboardInput { event, .. } => {
        self.handle_keyboard(event, event_loop)
      }
      WindowEvent::RedrawRequested => self.handle_redraw(),
      WindowEvent::CloseRequested => event_loop.exit(),
      _ => {}
    }
  }

  fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
    let Some(world) = self.world.as_mut() else {
      return;
    };
    if std::mem::take(&mut world.requests.pending) {
      world.requests.due = true;
      self.request_redraw();
    }
  }
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("info"),
  )
  .init();

  let event_loop = EventLoop::new()?;
  let mut app = App::new(Config::default());
  event_loop.run_app(&mut app)?;

  match app.setup_error.take() {
    Some(e) => Err(e),
    None => Ok(()),
  }
}
