//! The seam between the renderer and a GPU API.
//!
//! A backend only executes commands. Which program is in use and which
//! framebuffer is bound is tracked by
//! [`GraphicsContext`](crate::GraphicsContext), which hands the bound
//! target to every call that needs one.

use crate::geometry::Geometry;
use crate::uniform::{UniformKind, UniformTable};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawState {
  pub depth_test: bool,
}

pub trait Backend {
  type Program;
  type Texture: Clone;
  type Framebuffer: Clone;
  type Mesh;

  fn compile_program(
    &mut self,
    label: &str,
    vertex: &str,
    fragment: &str,
  ) -> Result<Self::Program>;

  /// Declared type of an active uniform, `None` if the linked program has
  /// no uniform of that name.
  fn uniform_kind(
    &self,
    program: &Self::Program,
    name: &str,
  ) -> Option<UniformKind>;

  /// Color texture of the given size plus a framebuffer rendering into it.
  fn create_render_target(
    &mut self,
    width: u32,
    height: u32,
  ) -> Result<(Self::Texture, Self::Framebuffer)>;

  fn upload(&mut self, geometry: &Geometry) -> Result<Self::Mesh>;

  fn begin_frame(&mut self) -> Result<()>;

  fn finish_frame(&mut self) -> Result<()>;

  /// `target` is `None` for the default framebuffer.
  fn clear(
    &mut self,
    target: Option<&Self::Framebuffer>,
    color: Option<[f32; 4]>,
    depth: Option<f32>,
  ) -> Result<()>;

  fn draw(
    &mut self,
    target: Option<&Self::Framebuffer>,
    mesh: &Self::Mesh,
    program: &Self::Program,
    uniforms: &UniformTable<Self::Texture>,
    state: &DrawState,
  ) -> Result<()>;
}
