use crate::backend::Backend;
use crate::context::GraphicsContext;
use crate::geometry::Geometry;
use crate::program::ShaderProgram;
use crate::Result;

pub trait Drawable<B: Backend> {
  fn draw(
    &self,
    ctx: &mut GraphicsContext<B>,
    program: &ShaderProgram<B>,
  ) -> Result<()>;
}

/// Geometry uploaded once at construction.
pub struct Model<B: Backend> {
  label: &'static str,
  mesh: B::Mesh,
}

impl<B: Backend> Model<B> {
  pub fn new(ctx: &mut GraphicsContext<B>, geometry: &Geometry) -> Result<Self> {
    let mesh = ctx.upload(geometry)?;
    Ok(Self {
      label: geometry.label,
      mesh,
    })
  }

  pub fn label(&self) -> &'static str {
    self.label
  }
}

impl<B: Backend> Drawable<B> for Model<B> {
  fn draw(
    &self,
    ctx: &mut GraphicsContext<B>,
    program: &ShaderProgram<B>,
  ) -> Result<()> {
    log::trace!("drawing {} with `{}`", self.label, program.label());
    ctx.draw(&self.mesh, program)
  }
}
