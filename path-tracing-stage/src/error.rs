use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::uniform::UniformKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
  Vertex,
  Fragment,
}

impl fmt::Display for ShaderStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShaderStage::Vertex => f.write_str("vertex"),
      ShaderStage::Fragment => f.write_str("fragment"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("no graphics context: {0}")]
  ContextAcquisition(#[from] common::ContextError),
  #[error("{stage} shader of program `{program}` failed to compile:\n{log}")]
  ShaderCompile {
    program: String,
    stage: ShaderStage,
    log: String,
  },
  #[error("program `{program}` failed to link:\n{log}")]
  ShaderLink { program: String, log: String },
  #[error("uniform `{name}` is declared as {expected} but was given {found}")]
  UniformTypeMismatch {
    name: String,
    expected: UniformKind,
    found: UniformKind,
  },
  /// A raw component list does not have the arity of its declared type.
  #[error("{kind} takes {expected} components, got {found}")]
  UniformArity {
    kind: UniformKind,
    expected: usize,
    found: usize,
  },
  #[error("program `{0}` is not in use")]
  ProgramNotInUse(String),
  #[error("another render target is already bound")]
  TargetAlreadyBound,
  #[error("failed to read shader {}: {source}", path.display())]
  ShaderSource {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("unknown shader source `{0}`")]
  UnknownShader(String),
  #[error("render error: {0}")]
  Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
