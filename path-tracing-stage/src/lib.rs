//! A small OpenGL stage: a few colored primitives plus a quad textured
//! with the output of a fragment-shader path tracer, rendered offscreen
//! every frame and optionally rotated around the y axis.

pub mod animation;
pub mod backend;
pub mod config;
pub mod context;
pub mod drawable;
pub mod error;
pub mod geometry;
pub mod glium_backend;
pub mod pathtracing;
pub mod program;
pub mod render_target;
pub mod scene;
pub mod shaders;
pub mod uniform;

#[cfg(test)]
mod testing;

pub use animation::{Animation, FrameScheduler};
pub use backend::Backend;
pub use config::Config;
pub use context::GraphicsContext;
pub use drawable::{Drawable, Model};
pub use error::{Error, Result};
pub use glium_backend::GliumBackend;
pub use program::ShaderProgram;
pub use render_target::RenderTarget;
pub use scene::{DrawOptions, ObjectKind, ProgramRole, Scene};
pub use uniform::{UniformAssignment, UniformValue};
