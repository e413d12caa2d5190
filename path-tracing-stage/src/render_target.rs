use std::ops::{Deref, DerefMut};

use crate::backend::Backend;
use crate::context::{GraphicsContext, TargetId};
use crate::Result;

/// Offscreen color texture with a framebuffer rendering into it. The
/// texture is sampled with nearest filtering and has no mipmaps.
pub struct RenderTarget<B: Backend> {
  id: TargetId,
  width: u32,
  height: u32,
  texture: B::Texture,
  framebuffer: B::Framebuffer,
}

impl<B: Backend> RenderTarget<B> {
  /// Contents are undefined until something was drawn into the target.
  pub fn new(
    ctx: &mut GraphicsContext<B>,
    width: u32,
    height: u32,
  ) -> Result<Self> {
    let (texture, framebuffer) =
      ctx.backend_mut().create_render_target(width, height)?;
    let id = ctx.next_target_id();
    log::debug!("created {}x{} render target {:?}", width, height, id);

    Ok(Self {
      id,
      width,
      height,
      texture,
      framebuffer,
    })
  }

  pub fn id(&self) -> TargetId {
    self.id
  }

  pub fn size(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  /// The color attachment, for sampling in a later pass.
  pub fn texture(&self) -> &B::Texture {
    &self.texture
  }

  /// Redirects drawing into this target until the returned guard is
  /// dropped. The depth attachment is cleared, color is kept.
  pub fn bind_as_target<'a>(
    &self,
    ctx: &'a mut GraphicsContext<B>,
  ) -> Result<BoundTarget<'a, B>> {
    ctx.bind_framebuffer(self.id, self.framebuffer.clone())?;
    let mut bound = BoundTarget { ctx };
    bound.clear_depth(1.0)?;
    Ok(bound)
  }

  /// Runs `f` with this target bound.
  pub fn render_to<T>(
    &self,
    ctx: &mut GraphicsContext<B>,
    f: impl FnOnce(&mut GraphicsContext<B>) -> Result<T>,
  ) -> Result<T> {
    let mut bound = self.bind_as_target(ctx)?;
    f(&mut *bound)
  }
}

/// A bound render target. Dropping it rebinds the default framebuffer on
/// every exit path.
pub struct BoundTarget<'a, B: Backend> {
  ctx: &'a mut GraphicsContext<B>,
}

impl<B: Backend> BoundTarget<'_, B> {
  pub fn unbind(self) {}
}

impl<B: Backend> Deref for BoundTarget<'_, B> {
  type Target = GraphicsContext<B>;

  fn deref(&self) -> &Self::Target {
    self.ctx
  }
}

impl<B: Backend> DerefMut for BoundTarget<'_, B> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    self.ctx
  }
}

impl<B: Backend> Drop for BoundTarget<'_, B> {
  fn drop(&mut self) {
    self.ctx.restore_default_framebuffer();
  }
}
