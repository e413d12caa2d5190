//! GLSL sources by role name. The role names double as file names:
//! `pathtracing_frag` lives in `assets/shaders/pathtracing.frag`.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const NO_COLOR_VERT: &str = "noColor_vert";
pub const CONSTANT_COLOR_FRAG: &str = "constantColor_frag";
pub const PER_VERTEX_COLOR_VERT: &str = "perVertexColor_vert";
pub const PER_VERTEX_COLOR_FRAG: &str = "perVertexColor_frag";
pub const PATHTRACING_VERT: &str = "pathtracing_vert";
pub const PATHTRACING_FRAG: &str = "pathtracing_frag";
pub const TEXTURE_VERT: &str = "texture_vert";
pub const TEXTURE_FRAG: &str = "texture_frag";

const SOURCES: [(&str, &str); 8] = [
  (NO_COLOR_VERT, include_str!("../assets/shaders/noColor.vert")),
  (
    CONSTANT_COLOR_FRAG,
    include_str!("../assets/shaders/constantColor.frag"),
  ),
  (
    PER_VERTEX_COLOR_VERT,
    include_str!("../assets/shaders/perVertexColor.vert"),
  ),
  (
    PER_VERTEX_COLOR_FRAG,
    include_str!("../assets/shaders/perVertexColor.frag"),
  ),
  (PATHTRACING_VERT, include_str!("../assets/shaders/pathtracing.vert")),
  (PATHTRACING_FRAG, include_str!("../assets/shaders/pathtracing.frag")),
  (TEXTURE_VERT, include_str!("../assets/shaders/texture.vert")),
  (TEXTURE_FRAG, include_str!("../assets/shaders/texture.frag")),
];

/// Source compiled into the binary for `role`.
pub fn source(role: &str) -> Result<&'static str> {
  SOURCES
    .iter()
    .find(|(name, _)| *name == role)
    .map(|(_, source)| *source)
    .ok_or_else(|| Error::UnknownShader(role.to_owned()))
}

/// `noColor_vert` => `noColor.vert`
pub fn file_name(role: &str) -> Result<String> {
  source(role)?;
  match role.rsplit_once('_') {
    Some((stem, ext)) => Ok(format!("{}.{}", stem, ext)),
    None => Err(Error::UnknownShader(role.to_owned())),
  }
}

/// Reads the current source of `role` from `dir`, for reloading shaders
/// while the program runs.
pub fn load(dir: &Path, role: &str) -> Result<String> {
  let path: PathBuf = dir.join(file_name(role)?);
  std::fs::read_to_string(&path)
    .map_err(|source| Error::ShaderSource { path, source })
}
