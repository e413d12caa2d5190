use std::rc::Rc;

use glium::framebuffer::{DepthRenderBuffer, SimpleFrameBuffer};
use glium::glutin::surface::WindowSurface;
use glium::index::PrimitiveType;
use glium::program::{ProgramCreationError, ShaderType};
use glium::texture::{DepthFormat, MipmapsOption, UncompressedFloatFormat};
use glium::uniforms::{
  MagnifySamplerFilter, MinifySamplerFilter, SamplerBehavior, UniformType,
  Uniforms,
};
use glium::{
  implement_vertex, Display, DrawParameters, Frame, IndexBuffer, Program,
  Surface, Texture2d, VertexBuffer,
};

use crate::backend::{Backend, DrawState};
use crate::error::ShaderStage;
use crate::geometry::{Geometry, Primitive, Vertex};
use crate::uniform::{UniformEntry, UniformKind, UniformTable, UniformValue};
use crate::{Error, Result};

implement_vertex!(Vertex, position, color, tex_coords);

fn render_error(e: impl std::fmt::Display) -> Error {
  Error::Render(e.to_string())
}

pub struct GliumMesh {
  vertices: VertexBuffer<Vertex>,
  indices: IndexBuffer<u32>,
}

pub struct GliumTarget {
  texture: Rc<Texture2d>,
  depth: DepthRenderBuffer,
}

impl GliumTarget {
  fn framebuffer<'a>(
    &'a self,
    display: &Display<WindowSurface>,
  ) -> Result<SimpleFrameBuffer<'a>> {
    SimpleFrameBuffer::with_depth_buffer(display, &*self.texture, &self.depth)
      .map_err(render_error)
  }
}

/// Renders through glium onto a window surface. On-screen drawing needs
/// a frame started with `begin_frame`.
pub struct GliumBackend {
  display: Display<WindowSurface>,
  frame: Option<Frame>,
}

impl GliumBackend {
  pub fn new(display: Display<WindowSurface>) -> Self {
    Self {
      display,
      frame: None,
    }
  }

  pub fn display(&self) -> &Display<WindowSurface> {
    &self.display
  }

  pub fn resize(&self, size: (u32, u32)) {
    self.display.resize(size);
  }

  fn frame_mut(&mut self) -> Result<&mut Frame> {
    self
      .frame
      .as_mut()
      .ok_or_else(|| Error::Render("no frame in progress".to_owned()))
  }
}

impl Drop for GliumBackend {
  fn drop(&mut self) {
    if let Some(frame) = self.frame.take() {
      if let Err(e) = frame.finish() {
        log::warn!("failed to finish the last frame: {}", e);
      }
    }
  }
}

fn compile_error(label: &str, e: ProgramCreationError) -> Error {
  let program = label.to_owned();
  match e {
    ProgramCreationError::CompilationError(log, ty) => {
      // only vertex and fragment shaders are ever compiled here
      let stage = match ty {
        ShaderType::Fragment => ShaderStage::Fragment,
        _ => ShaderStage::Vertex,
      };
      Error::ShaderCompile {
        program,
        stage,
        log,
      }
    }
    ProgramCreationError::LinkingError(log) => Error::ShaderLink { program, log },
    other => Error::ShaderLink {
      program,
      log: other.to_string(),
    },
  }
}

fn nearest() -> SamplerBehavior {
  SamplerBehavior {
    minify_filter: MinifySamplerFilter::Nearest,
    magnify_filter: MagnifySamplerFilter::Nearest,
    ..Default::default()
  }
}

impl Uniforms for UniformTable<Rc<Texture2d>> {
  fn visit_values<'a, F: FnMut(&str, glium::uniforms::UniformValue<'a>)>(
    &'a self,
    mut f: F,
  ) {
    use glium::uniforms::UniformValue as Gl;

    for (name, entry) in self.iter() {
      let value = match entry {
        UniformEntry::Value(UniformValue::Float(x)) => Gl::Float(*x),
        UniformEntry::Value(UniformValue::Bool(b)) => Gl::Bool(*b),
        UniformEntry::Value(UniformValue::Vec3(v)) => Gl::Vec3(*v),
        UniformEntry::Value(UniformValue::Mat4(m)) => Gl::Mat4(*m),
        // glium assigns texture units on its own at draw time, the unit
        // index only matters to backends that bind explicitly
        UniformEntry::Sampler { texture, .. } => {
          Gl::Texture2d(texture.as_ref(), Some(nearest()))
        }
      };
      f(name, value);
    }
  }
}

impl Backend for GliumBackend {
  type Program = Program;
  type Texture = Rc<Texture2d>;
  type Framebuffer = Rc<GliumTarget>;
  type Mesh = GliumMesh;

  fn compile_program(
    &mut self,
    label: &str,
    vertex: &str,
    fragment: &str,
  ) -> Result<Program> {
    Program::from_source(&self.display, vertex, fragment, None)
      .map_err(|e| compile_error(label, e))
  }

  fn uniform_kind(&self, program: &Program, name: &str) -> Option<UniformKind> {
    let uniform = program.get_uniform(name)?;
    let kind = match uniform.ty {
      UniformType::Float => UniformKind::Float,
      UniformType::Bool => UniformKind::Bool,
      UniformType::FloatVec3 => UniformKind::Vec3,
      UniformType::FloatMat4 => UniformKind::Mat4,
      UniformType::Sampler2d => UniformKind::Sampler2d,
      _ => UniformKind::Other,
    };
    Some(kind)
  }

  fn create_render_target(
    &mut self,
    width: u32,
    height: u32,
  ) -> Result<(Rc<Texture2d>, Rc<GliumTarget>)> {
    let texture = Texture2d::empty_with_format(
      &self.display,
      UncompressedFloatFormat::U8U8U8U8,
      MipmapsOption::NoMipmap,
      width,
      height,
    )
    .map_err(render_error)?;
    let depth =
      DepthRenderBuffer::new(&self.display, DepthFormat::I24, width, height)
        .map_err(render_error)?;

    let texture = Rc::new(texture);
    let target = GliumTarget {
      texture: texture.clone(),
      depth,
    };
    Ok((texture, Rc::new(target)))
  }

  fn upload(&mut self, geometry: &Geometry) -> Result<GliumMesh> {
    let primitive = match geometry.primitive {
      Primitive::Triangles => PrimitiveType::TrianglesList,
      Primitive::TriangleStrip => PrimitiveType::TriangleStrip,
    };
    let vertices =
      VertexBuffer::new(&self.display, &geometry.vertices).map_err(render_error)?;
    let indices = IndexBuffer::new(&self.display, primitive, &geometry.indices)
      .map_err(render_error)?;

    Ok(GliumMesh { vertices, indices })
  }

  fn begin_frame(&mut self) -> Result<()> {
    if self.frame.is_some() {
      return Err(Error::Render("frame already in progress".to_owned()));
    }
    self.frame = Some(self.display.draw());
    Ok(())
  }

  fn finish_frame(&mut self) -> Result<()> {
    let frame = self
      .frame
      .take()
      .ok_or_else(|| Error::Render("no frame in progress".to_owned()))?;
    frame.finish().map_err(render_error)
  }

  fn clear(
    &mut self,
    target: Option<&Rc<GliumTarget>>,
    color: Option<[f32; 4]>,
    depth: Option<f32>,
  ) -> Result<()> {
    let color = color.map(|[r, g, b, a]| (r, g, b, a));
    match target {
      Some(target) => {
        let mut fb = target.framebuffer(&self.display)?;
        fb.clear(None, color, false, depth, None);
      }
      None => self.frame_mut()?.clear(None, color, false, depth, None),
    }
    Ok(())
  }

  fn draw(
    &mut self,
    target: Option<&Rc<GliumTarget>>,
    mesh: &GliumMesh,
    program: &Program,
    uniforms: &UniformTable<Rc<Texture2d>>,
    state: &DrawState,
  ) -> Result<()> {
    let depth = if state.depth_test {
      glium::Depth {
        test: glium::draw_parameters::DepthTest::IfLess,
        write: true,
        ..Default::default()
      }
    } else {
      Default::default()
    };
    let params = DrawParameters {
      depth,
      ..Default::default()
    };

    let result = match target {
      Some(target) => {
        let mut fb = target.framebuffer(&self.display)?;
        fb.draw(&mesh.vertices, &mesh.indices, program, uniforms, &params)
      }
      None => self.frame_mut()?.draw(
        &mesh.vertices,
        &mesh.indices,
        program,
        uniforms,
        &params,
      ),
    };
    result.map_err(render_error)
  }
}
