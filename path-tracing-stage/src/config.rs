use std::path::PathBuf;

use crate::pathtracing::PathTracingScene;
use crate::scene::DrawOptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandShape {
  pub radius: f32,
  pub height: f32,
  pub segments: u32,
}

impl Default for BandShape {
  fn default() -> Self {
    Self {
      radius: 0.4,
      height: 0.2,
      segments: 50,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub window_title: String,
  pub window_size: (u32, u32),
  /// Size of the offscreen image the path tracer renders into.
  pub target_size: (u32, u32),
  pub clear_color: [f32; 4],
  pub speed_degrees_per_second: f32,
  pub draw_options: DrawOptions,
  /// Start rotating right after the first frame instead of waiting for
  /// the user.
  pub start_animation: bool,
  pub band: BandShape,
  pub path_tracing: PathTracingScene,
  /// Where shader sources are reloaded from at runtime.
  pub shader_dir: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      window_title: "Path Tracing Stage".to_owned(),
      window_size: (512, 512),
      target_size: (512, 512),
      clear_color: [0.7, 0.7, 0.7, 1.0],
      speed_degrees_per_second: 20.0,
      draw_options: DrawOptions::default(),
      start_animation: false,
      band: BandShape::default(),
      path_tracing: PathTracingScene::default(),
      shader_dir: PathBuf::from(common::project_asset_path!("shaders")),
    }
  }
}
