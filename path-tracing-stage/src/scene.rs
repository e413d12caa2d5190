use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use cgmath::{Matrix4, SquareMatrix as _};
use thiserror::Error;

use crate::backend::Backend;
use crate::config::Config;
use crate::context::GraphicsContext;
use crate::drawable::{Drawable as _, Model};
use crate::geometry;
use crate::pathtracing::PathTracingScene;
use crate::program::ShaderProgram;
use crate::render_target::RenderTarget;
use crate::shaders;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
  Triangle,
  Cube,
  Band,
  Stage,
}

impl ObjectKind {
  pub const ALL: [Self; 4] = [
    ObjectKind::Triangle,
    ObjectKind::Cube,
    ObjectKind::Band,
    ObjectKind::Stage,
  ];

  pub fn name(self) -> &'static str {
    match self {
      ObjectKind::Triangle => "Triangle",
      ObjectKind::Cube => "Cube",
      ObjectKind::Band => "Band",
      ObjectKind::Stage => "Stage",
    }
  }

  /// Program the object is drawn with. The stage is drawn twice and this
  /// is its first pass.
  pub fn program(self) -> ProgramRole {
    match self {
      ObjectKind::Triangle => ProgramRole::VertexColor,
      ObjectKind::Cube | ObjectKind::Band => ProgramRole::FlatColor,
      ObjectKind::Stage => ProgramRole::PathTracing,
    }
  }
}

impl fmt::Display for ObjectKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Error)]
#[error("unknown object `{0}`")]
pub struct UnknownObject(pub String);

impl FromStr for ObjectKind {
  type Err = UnknownObject;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    ObjectKind::ALL
      .into_iter()
      .find(|kind| kind.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| UnknownObject(s.to_owned()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramRole {
  FlatColor,
  VertexColor,
  PathTracing,
  Texture,
}

impl ProgramRole {
  pub const ALL: [Self; 4] = [
    ProgramRole::FlatColor,
    ProgramRole::VertexColor,
    ProgramRole::PathTracing,
    ProgramRole::Texture,
  ];

  pub fn label(self) -> &'static str {
    match self {
      ProgramRole::FlatColor => "flat color",
      ProgramRole::VertexColor => "per-vertex color",
      ProgramRole::PathTracing => "path tracing",
      ProgramRole::Texture => "texture",
    }
  }

  /// (vertex, fragment) shader role names.
  pub fn shaders(self) -> (&'static str, &'static str) {
    match self {
      ProgramRole::FlatColor => {
        (shaders::NO_COLOR_VERT, shaders::CONSTANT_COLOR_FRAG)
      }
      ProgramRole::VertexColor => {
        (shaders::PER_VERTEX_COLOR_VERT, shaders::PER_VERTEX_COLOR_FRAG)
      }
      ProgramRole::PathTracing => {
        (shaders::PATHTRACING_VERT, shaders::PATHTRACING_FRAG)
      }
      ProgramRole::Texture => (shaders::TEXTURE_VERT, shaders::TEXTURE_FRAG),
    }
  }
}

/// Which objects get drawn. Toggled from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
  pub triangle: bool,
  pub cube: bool,
  pub band: bool,
  pub stage: bool,
}

impl Default for DrawOptions {
  fn default() -> Self {
    Self {
      triangle: false,
      cube: false,
      band: false,
      stage: true,
    }
  }
}

impl DrawOptions {
  pub fn none() -> Self {
    Self {
      triangle: false,
      cube: false,
      band: false,
      stage: false,
    }
  }

  fn flag_mut(&mut self, kind: ObjectKind) -> &mut bool {
    match kind {
      ObjectKind::Triangle => &mut self.triangle,
      ObjectKind::Cube => &mut self.cube,
      ObjectKind::Band => &mut self.band,
      ObjectKind::Stage => &mut self.stage,
    }
  }

  pub fn get(&self, kind: ObjectKind) -> bool {
    match kind {
      ObjectKind::Triangle => self.triangle,
      ObjectKind::Cube => self.cube,
      ObjectKind::Band => self.band,
      ObjectKind::Stage => self.stage,
    }
  }

  pub fn set(&mut self, kind: ObjectKind, enabled: bool) {
    *self.flag_mut(kind) = enabled;
  }

  /// Returns the new state.
  pub fn toggle(&mut self, kind: ObjectKind) -> bool {
    let flag = self.flag_mut(kind);
    *flag = !*flag;
    *flag
  }

  pub fn enabled(&self) -> impl Iterator<Item = ObjectKind> + '_ {
    ObjectKind::ALL.into_iter().filter(|kind| self.get(*kind))
  }
}

struct Programs<B: Backend> {
  flat_color: ShaderProgram<B>,
  vertex_color: ShaderProgram<B>,
  path_tracing: ShaderProgram<B>,
  texture: ShaderProgram<B>,
}

impl<B: Backend> Programs<B> {
  fn compile(ctx: &mut GraphicsContext<B>) -> Result<Self> {
    let mut compile = |role: ProgramRole| {
      let (vert, frag) = role.shaders();
      ShaderProgram::from_roles(ctx, role.label(), vert, frag)
    };

    Ok(Self {
      flat_color: compile(ProgramRole::FlatColor)?,
      vertex_color: compile(ProgramRole::VertexColor)?,
      path_tracing: compile(ProgramRole::PathTracing)?,
      texture: compile(ProgramRole::Texture)?,
    })
  }

  fn get(&self, role: ProgramRole) -> &ShaderProgram<B> {
    match role {
      ProgramRole::FlatColor => &self.flat_color,
      ProgramRole::VertexColor => &self.vertex_color,
      ProgramRole::PathTracing => &self.path_tracing,
      ProgramRole::Texture => &self.texture,
    }
  }

  fn get_mut(&mut self, role: ProgramRole) -> &mut ShaderProgram<B> {
    match role {
      ProgramRole::FlatColor => &mut self.flat_color,
      ProgramRole::VertexColor => &mut self.vertex_color,
      ProgramRole::PathTracing => &mut self.path_tracing,
      ProgramRole::Texture => &mut self.texture,
    }
  }
}

struct Objects<B: Backend> {
  triangle: Model<B>,
  cube: Model<B>,
  band: Model<B>,
  stage: Model<B>,
}

impl<B: Backend> Objects<B> {
  fn get(&self, kind: ObjectKind) -> &Model<B> {
    match kind {
      ObjectKind::Triangle => &self.triangle,
      ObjectKind::Cube => &self.cube,
      ObjectKind::Band => &self.band,
      ObjectKind::Stage => &self.stage,
    }
  }
}

/// Four objects, the programs they are drawn with, and the offscreen
/// target the stage's path-traced image goes through.
pub struct Scene<B: Backend> {
  /// Model-view matrix, rewritten by the animation every frame.
  pub transformation: Matrix4<f32>,
  pub draw_options: DrawOptions,
  pub clear_color: [f32; 4],
  pub path_tracing: PathTracingScene,
  projection: Matrix4<f32>,
  programs: Programs<B>,
  objects: Objects<B>,
  target: RenderTarget<B>,
  started_at: Instant,
}

impl<B: Backend> Scene<B> {
  pub fn new(ctx: &mut GraphicsContext<B>, config: &Config) -> Result<Self> {
    let started_at = Instant::now();
    let programs = Programs::compile(ctx)?;

    let band = config.band;
    let objects = Objects {
      triangle: Model::new(ctx, &geometry::triangle())?,
      cube: Model::new(ctx, &geometry::cube())?,
      band: Model::new(
        ctx,
        &geometry::band(band.radius, band.height, band.segments),
      )?,
      stage: Model::new(ctx, &geometry::stage())?,
    };

    let (width, height) = config.target_size;
    let target = RenderTarget::new(ctx, width, height)?;
    log::info!("scene ready, drawing {:?}", config.draw_options);

    Ok(Self {
      transformation: Matrix4::identity(),
      draw_options: config.draw_options,
      clear_color: config.clear_color,
      path_tracing: config.path_tracing.clone(),
      projection: cgmath::ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0),
      programs,
      objects,
      target,
      started_at,
    })
  }

  pub fn started_at(&self) -> Instant {
    self.started_at
  }

  pub fn program(&self, role: ProgramRole) -> &ShaderProgram<B> {
    self.programs.get(role)
  }

  pub fn object(&self, kind: ObjectKind) -> &Model<B> {
    self.objects.get(kind)
  }

  pub fn target(&self) -> &RenderTarget<B> {
    &self.target
  }

  pub fn draw(&mut self, ctx: &mut GraphicsContext<B>) -> Result<()> {
    self.draw_at(ctx, Instant::now())
  }

  /// Draws one frame as of `now`. Any error aborts the frame; the
  /// default framebuffer is bound again whatever happened.
  pub fn draw_at(
    &mut self,
    ctx: &mut GraphicsContext<B>,
    now: Instant,
  ) -> Result<()> {
    self.upload_uniforms(ctx, now)?;

    ctx.clear(self.clear_color, 1.0)?;
    ctx.enable_depth_test();

    for kind in [ObjectKind::Triangle, ObjectKind::Cube, ObjectKind::Band] {
      if self.draw_options.get(kind) {
        let program = self.programs.get(kind.program());
        self.objects.get(kind).draw(ctx, program)?;
      }
    }

    if self.draw_options.stage {
      let stage = &self.objects.stage;
      // pass 1: path trace into the offscreen target
      self
        .target
        .render_to(ctx, |ctx| stage.draw(ctx, &self.programs.path_tracing))?;
      // pass 2: show it on screen
      stage.draw(ctx, &self.programs.texture)?;
    }

    Ok(())
  }

  fn upload_uniforms(
    &mut self,
    ctx: &mut GraphicsContext<B>,
    now: Instant,
  ) -> Result<()> {
    let seconds = now.saturating_duration_since(self.started_at).as_secs_f32();

    for role in ProgramRole::ALL {
      let program = self.programs.get_mut(role);
      program.use_program(ctx);
      program.set_uniform(ctx, "projectionMatrix", self.projection)?;
      program.set_uniform(ctx, "modelViewMatrix", self.transformation)?;

      match role {
        ProgramRole::PathTracing => {
          program.set_uniform(ctx, "secondsSinceStart", seconds)?;
          program.apply(ctx, &self.path_tracing.assignments())?;
        }
        ProgramRole::Texture => {
          program.set_texture(ctx, "texture0", 0, self.target.texture())?;
        }
        ProgramRole::FlatColor | ProgramRole::VertexColor => {}
      }
    }

    Ok(())
  }

  /// Recompiles every program from the sources in `dir`. Programs whose
  /// sources fail to load or compile keep running the old code; the
  /// first such error is returned.
  pub fn reload_shaders(
    &mut self,
    ctx: &mut GraphicsContext<B>,
    dir: &Path,
  ) -> Result<()> {
    let mut first_error = None;

    for role in ProgramRole::ALL {
      let (vert, frag) = role.shaders();
      let result = shaders::load(dir, vert).and_then(|vert_src| {
        let frag_src = shaders::load(dir, frag)?;
        self.programs.get_mut(role).recompile(ctx, &vert_src, &frag_src)
      });

      if let Err(e) = result {
        log::error!("failed to reload `{}`: {}", role.label(), e);
        first_error.get_or_insert(e);
      }
    }

    match first_error {
      Some(e) => Err(e),
      None => Ok(()),
    }
  }
}
