use crate::backend::{Backend, DrawState};
use crate::geometry::Geometry;
use crate::program::ShaderProgram;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u32);

/// Owns a backend together with the binding state a GPU API keeps
/// implicitly: the program in use, the bound framebuffer and the depth
/// test switch. Every renderer operation goes through one of these.
pub struct GraphicsContext<B: Backend> {
  backend: B,
  next_id: u32,
  active_program: Option<ProgramId>,
  // None is the default framebuffer
  framebuffer: Option<(TargetId, B::Framebuffer)>,
  state: DrawState,
}

impl<B: Backend> GraphicsContext<B> {
  pub fn new(backend: B) -> Self {
    Self {
      backend,
      next_id: 0,
      active_program: None,
      framebuffer: None,
      state: DrawState::default(),
    }
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }

  pub fn backend_mut(&mut self) -> &mut B {
    &mut self.backend
  }

  fn next_id(&mut self) -> u32 {
    self.next_id += 1;
    self.next_id
  }

  pub(crate) fn next_program_id(&mut self) -> ProgramId {
    ProgramId(self.next_id())
  }

  pub(crate) fn next_target_id(&mut self) -> TargetId {
    TargetId(self.next_id())
  }

  pub fn active_program(&self) -> Option<ProgramId> {
    self.active_program
  }

  pub(crate) fn set_active_program(&mut self, id: ProgramId) {
    if self.active_program != Some(id) {
      log::trace!("using program {:?}", id);
      self.active_program = Some(id);
    }
  }

  /// The offscreen target drawing currently goes to, `None` when drawing
  /// on screen.
  pub fn bound_target(&self) -> Option<TargetId> {
    self.framebuffer.as_ref().map(|(id, _)| *id)
  }

  pub(crate) fn bind_framebuffer(
    &mut self,
    id: TargetId,
    framebuffer: B::Framebuffer,
  ) -> Result<()> {
    if self.framebuffer.is_some() {
      return Err(Error::TargetAlreadyBound);
    }
    log::trace!("binding render target {:?}", id);
    self.framebuffer = Some((id, framebuffer));
    Ok(())
  }

  pub(crate) fn restore_default_framebuffer(&mut self) {
    if let Some((id, _)) = self.framebuffer.take() {
      log::trace!("unbinding render target {:?}", id);
    }
  }

  pub fn enable_depth_test(&mut self) {
    self.state.depth_test = true;
  }

  pub fn disable_depth_test(&mut self) {
    self.state.depth_test = false;
  }

  pub fn depth_test(&self) -> bool {
    self.state.depth_test
  }

  /// Clears color and depth of the bound framebuffer.
  pub fn clear(&mut self, color: [f32; 4], depth: f32) -> Result<()> {
    let target = self.framebuffer.as_ref().map(|(_, fb)| fb);
    self.backend.clear(target, Some(color), Some(depth))
  }

  pub(crate) fn clear_depth(&mut self, depth: f32) -> Result<()> {
    let target = self.framebuffer.as_ref().map(|(_, fb)| fb);
    self.backend.clear(target, None, Some(depth))
  }

  pub fn upload(&mut self, geometry: &Geometry) -> Result<B::Mesh> {
    log::debug!(
      "uploading {} ({} vertices)",
      geometry.label,
      geometry.vertices.len()
    );
    self.backend.upload(geometry)
  }

  /// Draws `mesh` into the bound framebuffer, putting `program` in use
  /// first.
  pub fn draw(
    &mut self,
    mesh: &B::Mesh,
    program: &ShaderProgram<B>,
  ) -> Result<()> {
    program.use_program(self);
    let target = self.framebuffer.as_ref().map(|(_, fb)| fb);
    self.backend.draw(
      target,
      mesh,
      program.handle(),
      program.uniforms(),
      &self.state,
    )
  }

  pub fn begin_frame(&mut self) -> Result<()> {
    self.backend.begin_frame()
  }

  pub fn finish_frame(&mut self) -> Result<()> {
    self.backend.finish_frame()
  }
}
