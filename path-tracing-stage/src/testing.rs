//! A backend that records what it is asked to do, for tests.

use std::collections::HashMap;

use crate::backend::{Backend, DrawState};
use crate::error::ShaderStage;
use crate::geometry::Geometry;
use crate::uniform::{UniformKind, UniformTable};
use crate::{Error, GraphicsContext, Result};

#[derive(Debug)]
pub struct FakeProgram {
  pub label: String,
  uniforms: HashMap<String, UniformKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeTexture(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFramebuffer {
  pub texture: FakeTexture,
}

#[derive(Debug)]
pub struct FakeMesh {
  pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct DrawCall {
  pub mesh: &'static str,
  pub program: String,
  /// Texture of the bound offscreen target, `None` on screen.
  pub target: Option<FakeTexture>,
  pub depth_test: bool,
  pub uniforms: UniformTable<FakeTexture>,
}

#[derive(Debug, Clone)]
pub enum Call {
  Compile {
    label: String,
  },
  CreateTarget {
    width: u32,
    height: u32,
  },
  Upload {
    label: &'static str,
  },
  BeginFrame,
  FinishFrame,
  Clear {
    target: Option<FakeTexture>,
    color: Option<[f32; 4]>,
    depth: Option<f32>,
  },
  Draw(DrawCall),
}

#[derive(Default)]
pub struct RecordingBackend {
  pub calls: Vec<Call>,
  /// Draws of the mesh with this label fail.
  pub fail_draw_of: Option<&'static str>,
  textures: usize,
  in_frame: bool,
}

impl RecordingBackend {
  pub fn draws(&self) -> Vec<&DrawCall> {
    self
      .calls
      .iter()
      .filter_map(|call| match call {
        Call::Draw(draw) => Some(draw),
        _ => None,
      })
      .collect()
  }

  pub fn forget(&mut self) {
    self.calls.clear();
  }
}

pub fn context() -> GraphicsContext<RecordingBackend> {
  GraphicsContext::new(RecordingBackend::default())
}

impl Backend for RecordingBackend {
  type Program = FakeProgram;
  type Texture = FakeTexture;
  type Framebuffer = FakeFramebuffer;
  type Mesh = FakeMesh;

  fn compile_program(
    &mut self,
    label: &str,
    vertex: &str,
    fragment: &str,
  ) -> Result<FakeProgram> {
    for (stage, source) in
      [(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)]
    {
      if source.contains("#error") {
        return Err(Error::ShaderCompile {
          program: label.to_owned(),
          stage,
          log: "0:1: '#error' : compilation terminated".to_owned(),
        });
      }
    }

    let mut uniforms = declared_uniforms(vertex);
    uniforms.extend(declared_uniforms(fragment));
    self.calls.push(Call::Compile {
      label: label.to_owned(),
    });
    Ok(FakeProgram {
      label: label.to_owned(),
      uniforms,
    })
  }

  fn uniform_kind(
    &self,
    program: &FakeProgram,
    name: &str,
  ) -> Option<UniformKind> {
    program.uniforms.get(name).copied()
  }

  fn create_render_target(
    &mut self,
    width: u32,
    height: u32,
  ) -> Result<(FakeTexture, FakeFramebuffer)> {
    self.textures += 1;
    let texture = FakeTexture(self.textures);
    self.calls.push(Call::CreateTarget { width, height });
    Ok((texture, FakeFramebuffer { texture }))
  }

  fn upload(&mut self, geometry: &Geometry) -> Result<FakeMesh> {
    self.calls.push(Call::Upload {
      label: geometry.label,
    });
    Ok(FakeMesh {
      label: geometry.label,
    })
  }

  fn begin_frame(&mut self) -> Result<()> {
    self.in_frame = true;
    self.calls.push(Call::BeginFrame);
    Ok(())
  }

  fn finish_frame(&mut self) -> Result<()> {
    if !std::mem::take(&mut self.in_frame) {
      return Err(Error::Render("no frame in progress".to_owned()));
    }
    self.calls.push(Call::FinishFrame);
    Ok(())
  }

  fn clear(
    &mut self,
    target: Option<&FakeFramebuffer>,
    color: Option<[f32; 4]>,
    depth: Option<f32>,
  ) -> Result<()> {
    self.calls.push(Call::Clear {
      target: target.map(|fb| fb.texture),
      color,
      depth,
    });
    Ok(())
  }

  fn draw(
    &mut self,
    target: Option<&FakeFramebuffer>,
    mesh: &FakeMesh,
    program: &FakeProgram,
    uniforms: &UniformTable<FakeTexture>,
    state: &DrawState,
  ) -> Result<()> {
    if self.fail_draw_of == Some(mesh.label) {
      return Err(Error::Render(format!(
        "INVALID_OPERATION was caused by drawing {}",
        mesh.label
      )));
    }

    self.calls.push(Call::Draw(DrawCall {
      mesh: mesh.label,
      program: program.label.clone(),
      target: target.map(|fb| fb.texture),
      depth_test: state.depth_test,
      uniforms: uniforms.clone(),
    }));
    Ok(())
  }
}

fn kind_of(ty: &str) -> UniformKind {
  match ty {
    "float" => UniformKind::Float,
    "bool" => UniformKind::Bool,
    "vec3" => UniformKind::Vec3,
    "mat4" => UniformKind::Mat4,
    "sampler2D" => UniformKind::Sampler2d,
    _ => UniformKind::Other,
  }
}

// "vec3 center;" => ("vec3", "center")
fn split_decl(line: &str) -> Option<(&str, &str)> {
  let line = line.strip_suffix(';')?;
  let (ty, name) = line.trim().split_once(char::is_whitespace)?;
  Some((ty.trim(), name.trim()))
}

/// Active uniform names the way GL reflection reports them, with struct
/// and array uniforms flattened into `name[i].field`. Understands one
/// declaration per line only.
pub fn declared_uniforms(source: &str) -> HashMap<String, UniformKind> {
  let mut structs: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
  let mut open_struct: Option<(&str, Vec<(&str, &str)>)> = None;
  let mut uniforms = HashMap::new();

  for line in source.lines().map(str::trim) {
    if let Some(rest) = line.strip_prefix("struct ") {
      open_struct = Some((rest.trim_end_matches('{').trim(), Vec::new()));
    } else if line.starts_with('}') {
      if let Some((name, fields)) = open_struct.take() {
        structs.insert(name, fields);
      }
    } else if let Some((_, fields)) = &mut open_struct {
      if let Some(field) = split_decl(line) {
        fields.push(field);
      }
    } else if let Some(rest) = line.strip_prefix("uniform ") {
      let Some((ty, decl)) = split_decl(rest) else {
        continue;
      };
      let names = match decl.split_once('[') {
        Some((name, count)) => {
          let count: usize = count.trim_end_matches(']').parse().unwrap_or(0);
          (0..count).map(|i| format!("{}[{}]", name, i)).collect()
        }
        None => vec![decl.to_owned()],
      };

      for base in names {
        match structs.get(ty) {
          Some(fields) => {
            for (field_ty, field) in fields {
              uniforms.insert(format!("{}.{}", base, field), kind_of(field_ty));
            }
          }
          None => {
            uniforms.insert(base, kind_of(ty));
          }
        }
      }
    }
  }

  uniforms
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flattens_struct_arrays() {
    let source = "
      struct Sphere {
        vec3 center;
        float radius;
      };
      uniform Sphere spheres[2];
      uniform mat4 modelViewMatrix;
      uniform sampler2D texture0;
    ";
    let uniforms = declared_uniforms(source);
    assert_eq!(uniforms.len(), 6);
    assert_eq!(uniforms["spheres[1].center"], UniformKind::Vec3);
    assert_eq!(uniforms["spheres[0].radius"], UniformKind::Float);
    assert_eq!(uniforms["modelViewMatrix"], UniformKind::Mat4);
    assert_eq!(uniforms["texture0"], UniformKind::Sampler2d);
  }
}
