use crate::backend::Backend;
use crate::context::{GraphicsContext, ProgramId};
use crate::shaders;
use crate::uniform::{
  UniformAssignment, UniformKind, UniformTable, UniformValue,
};
use crate::{Error, Result};

/// A linked vertex + fragment program and the uniform values assigned to
/// it. Uniforms can only be assigned while the program is in use.
pub struct ShaderProgram<B: Backend> {
  id: ProgramId,
  label: String,
  handle: B::Program,
  uniforms: UniformTable<B::Texture>,
}

impl<B: Backend> ShaderProgram<B> {
  pub fn compile(
    ctx: &mut GraphicsContext<B>,
    label: &str,
    vertex: &str,
    fragment: &str,
  ) -> Result<Self> {
    let handle = ctx.backend_mut().compile_program(label, vertex, fragment)?;
    let id = ctx.next_program_id();
    log::debug!("compiled program `{}` as {:?}", label, id);

    Ok(Self {
      id,
      label: label.to_owned(),
      handle,
      uniforms: UniformTable::new(),
    })
  }

  /// Compiles the program from two shader role names, e.g.
  /// `texture_vert` and `texture_frag`.
  pub fn from_roles(
    ctx: &mut GraphicsContext<B>,
    label: &str,
    vertex_role: &str,
    fragment_role: &str,
  ) -> Result<Self> {
    let vertex = shaders::source(vertex_role)?;
    let fragment = shaders::source(fragment_role)?;
    Self::compile(ctx, label, vertex, fragment)
  }

  /// Replaces the linked program with one built from new sources. On
  /// failure the current program stays untouched.
  pub fn recompile(
    &mut self,
    ctx: &mut GraphicsContext<B>,
    vertex: &str,
    fragment: &str,
  ) -> Result<()> {
    let handle =
      ctx.backend_mut().compile_program(&self.label, vertex, fragment)?;
    self.handle = handle;
    self.uniforms = UniformTable::new();
    log::debug!("recompiled program `{}`", self.label);
    Ok(())
  }

  pub fn id(&self) -> ProgramId {
    self.id
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn handle(&self) -> &B::Program {
    &self.handle
  }

  pub fn uniforms(&self) -> &UniformTable<B::Texture> {
    &self.uniforms
  }

  pub fn use_program(&self, ctx: &mut GraphicsContext<B>) {
    ctx.set_active_program(self.id);
  }

  pub fn is_in_use(&self, ctx: &GraphicsContext<B>) -> bool {
    ctx.active_program() == Some(self.id)
  }

  fn ensure_in_use(&self, ctx: &GraphicsContext<B>) -> Result<()> {
    if self.is_in_use(ctx) {
      Ok(())
    } else {
      Err(Error::ProgramNotInUse(self.label.clone()))
    }
  }

  /// Declared kind of `name`, or `None` (with a trace message) when the
  /// linked program does not have it.
  fn declared_kind(
    &self,
    ctx: &GraphicsContext<B>,
    name: &str,
  ) -> Option<UniformKind> {
    let kind = ctx.backend().uniform_kind(&self.handle, name);
    if kind.is_none() {
      log::trace!("program `{}` has no uniform `{}`", self.label, name);
    }
    kind
  }

  /// Assigns a uniform. Names the program does not declare (or that the
  /// compiler optimized out) are ignored.
  pub fn set_uniform(
    &mut self,
    ctx: &GraphicsContext<B>,
    name: &str,
    value: impl Into<UniformValue>,
  ) -> Result<()> {
    self.ensure_in_use(ctx)?;
    let value = value.into();

    let Some(expected) = self.declared_kind(ctx, name) else {
      return Ok(());
    };
    if expected != value.kind() {
      return Err(Error::UniformTypeMismatch {
        name: name.to_owned(),
        expected,
        found: value.kind(),
      });
    }

    self.uniforms.set_value(name, value);
    Ok(())
  }

  /// Assigns a uniform given as a type tag and a flat list of scalars.
  pub fn set_uniform_components(
    &mut self,
    ctx: &GraphicsContext<B>,
    name: &str,
    kind: UniformKind,
    data: &[f32],
  ) -> Result<()> {
    let value = UniformValue::from_components(kind, data)?;
    self.set_uniform(ctx, name, value)
  }

  pub fn apply(
    &mut self,
    ctx: &GraphicsContext<B>,
    assignments: &[UniformAssignment],
  ) -> Result<()> {
    for assignment in assignments {
      self.set_uniform(ctx, &assignment.name, assignment.value)?;
    }
    Ok(())
  }

  /// Binds `texture` to texture unit `unit` and points the sampler
  /// uniform `name` at that unit.
  pub fn set_texture(
    &mut self,
    ctx: &GraphicsContext<B>,
    name: &str,
    unit: u32,
    texture: &B::Texture,
  ) -> Result<()> {
    self.ensure_in_use(ctx)?;

    match self.declared_kind(ctx, name) {
      None => Ok(()),
      Some(UniformKind::Sampler2d) => {
        self.uniforms.set_sampler(name, unit, texture.clone());
        Ok(())
      }
      Some(expected) => Err(Error::UniformTypeMismatch {
        name: name.to_owned(),
        expected,
        found: UniformKind::Sampler2d,
      }),
    }
  }
}
