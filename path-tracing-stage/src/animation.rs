use std::time::Instant;

use cgmath::{Matrix4, Rad, SquareMatrix as _};

use crate::backend::Backend;
use crate::context::GraphicsContext;
use crate::scene::Scene;
use crate::Result;

/// The host's "call me before the next display refresh" primitive. A
/// request is served once; whoever wants another frame asks again.
pub trait FrameScheduler {
  fn request_frame(&mut self);
}

pub fn rotate_around_y(matrix: Matrix4<f32>, angle: Rad<f32>) -> Matrix4<f32> {
  matrix * Matrix4::from_angle_y(angle)
}

/// Spins the scene around the Y axis. The phase is measured from the
/// moment the scene was created, so stopping and starting again does not
/// reset the rotation.
#[derive(Debug)]
pub struct Animation {
  started_at: Instant,
  pub speed_degrees_per_second: f32,
  running: bool,
  frame_pending: bool,
}

impl Animation {
  pub fn new(started_at: Instant, speed_degrees_per_second: f32) -> Self {
    Self {
      started_at,
      speed_degrees_per_second,
      running: false,
      frame_pending: false,
    }
  }

  pub fn for_scene<B: Backend>(
    scene: &Scene<B>,
    speed_degrees_per_second: f32,
  ) -> Self {
    Self::new(scene.started_at(), speed_degrees_per_second)
  }

  pub fn is_running(&self) -> bool {
    self.running
  }

  pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
    if self.running {
      return;
    }
    log::info!(
      "animation started at {} deg/s",
      self.speed_degrees_per_second
    );
    self.running = true;
    self.request_frame(scheduler);
  }

  /// No further frames are drawn. A frame already being drawn finishes.
  pub fn stop(&mut self) {
    if self.running {
      log::info!("animation stopped");
      self.running = false;
    }
  }

  // at most one outstanding request, so start/stop/start does not fork
  // a second frame chain
  fn request_frame(&mut self, scheduler: &mut impl FrameScheduler) {
    if !self.frame_pending {
      self.frame_pending = true;
      scheduler.request_frame();
    }
  }

  pub fn angle_at(&self, now: Instant) -> Rad<f32> {
    let elapsed_ms =
      now.saturating_duration_since(self.started_at).as_secs_f64() * 1000.0;
    let speed = f64::from(self.speed_degrees_per_second);
    let angle = elapsed_ms / 1000.0 * speed / 180.0 * std::f64::consts::PI;
    Rad(angle as f32)
  }

  pub fn transformation_at(&self, now: Instant) -> Matrix4<f32> {
    rotate_around_y(Matrix4::identity(), self.angle_at(now))
  }

  /// Called by the host when a requested frame comes due. Rotates and
  /// redraws the scene, then asks for the next frame. Returns whether a
  /// frame was drawn.
  ///
  /// A failing draw returns the error without asking for another frame:
  /// the animation stays "running" but no further ticks arrive until the
  /// caller stops and starts it again.
  pub fn tick<B: Backend>(
    &mut self,
    now: Instant,
    scene: &mut Scene<B>,
    ctx: &mut GraphicsContext<B>,
    scheduler: &mut impl FrameScheduler,
  ) -> Result<bool> {
    self.frame_pending = false;
    if !self.running {
      return Ok(false);
    }

    scene.transformation = self.transformation_at(now);
    scene.draw_at(ctx, now)?;

    self.request_frame(scheduler);
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use std::f32::consts::PI;
  use std::time::Duration;

  use cgmath::SquareMatrix as _;

  use super::*;
  use crate::config::Config;
  use crate::testing::{context, RecordingBackend};

  #[derive(Default)]
  struct CountingScheduler {
    requests: usize,
  }

  impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
      self.requests += 1;
    }
  }

  fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = a.into();
    let b: [[f32; 4]; 4] = b.into();
    for (col_a, col_b) in a.iter().zip(&b) {
      for (x, y) in col_a.iter().zip(col_b) {
        assert!((x - y).abs() < 1e-5, "{:?} != {:?}", a, b);
      }
    }
  }

  fn setup() -> (
    GraphicsContext<RecordingBackend>,
    Scene<RecordingBackend>,
    Animation,
  ) {
    let mut ctx = context();
    let scene = Scene::new(&mut ctx, &Config::default()).unwrap();
    let animation = Animation::for_scene(&scene, 20.0);
    ctx.backend_mut().forget();
    (ctx, scene, animation)
  }

  fn at(animation: &Animation, ms: u64) -> Instant {
    animation.started_at + Duration::from_millis(ms)
  }

  #[test]
  fn half_turn_after_nine_seconds_at_twenty_degrees() {
    let animation = Animation::new(Instant::now(), 20.0);
    let now = at(&animation, 9000);

    assert!((animation.angle_at(now).0 - PI).abs() < 1e-6);
    assert_matrix_eq(
      animation.transformation_at(now),
      Matrix4::from_angle_y(Rad(PI)),
    );
  }

  #[test]
  fn rotate_around_y_composes_on_the_right() {
    let base = Matrix4::from_angle_x(Rad(0.3));
    assert_matrix_eq(
      rotate_around_y(base, Rad(0.7)),
      base * Matrix4::from_angle_y(Rad(0.7)),
    );
  }

  #[test]
  fn starts_stopped_and_start_is_idempotent() {
    let mut animation = Animation::new(Instant::now(), 20.0);
    let mut scheduler = CountingScheduler::default();
    assert!(!animation.is_running());

    animation.start(&mut scheduler);
    animation.start(&mut scheduler);
    assert!(animation.is_running());
    assert_eq!(scheduler.requests, 1);
  }

  #[test]
  fn tick_rotates_redraws_and_rearms() {
    let (mut ctx, mut scene, mut animation) = setup();
    let mut scheduler = CountingScheduler::default();
    animation.start(&mut scheduler);

    let now = at(&animation, 4500);
    let drawn = animation
      .tick(now, &mut scene, &mut ctx, &mut scheduler)
      .unwrap();

    assert!(drawn);
    assert_eq!(scheduler.requests, 2);
    assert_eq!(ctx.backend().draws().len(), 2);
    assert_matrix_eq(scene.transformation, Matrix4::from_angle_y(Rad(PI / 2.0)));
  }

  #[test]
  fn no_draws_after_stop() {
    let (mut ctx, mut scene, mut animation) = setup();
    let mut scheduler = CountingScheduler::default();
    animation.start(&mut scheduler);
    animation.stop();
    animation.stop();

    for i in 0..5 {
      let now = at(&animation, 100 * i);
      let drawn = animation
        .tick(now, &mut scene, &mut ctx, &mut scheduler)
        .unwrap();
      assert!(!drawn);
    }

    assert!(ctx.backend().draws().is_empty());
    assert_eq!(scheduler.requests, 1);
  }

  #[test]
  fn restart_keeps_the_phase() {
    let (mut ctx, mut scene, mut animation) = setup();
    let mut scheduler = CountingScheduler::default();

    animation.start(&mut scheduler);
    animation.stop();
    animation
      .tick(at(&animation, 10), &mut scene, &mut ctx, &mut scheduler)
      .unwrap();
    animation.start(&mut scheduler);
    animation
      .tick(at(&animation, 9000), &mut scene, &mut ctx, &mut scheduler)
      .unwrap();

    assert_matrix_eq(scene.transformation, Matrix4::from_angle_y(Rad(PI)));
  }

  #[test]
  fn one_request_outstanding_across_stop_and_start() {
    let mut animation = Animation::new(Instant::now(), 20.0);
    let mut scheduler = CountingScheduler::default();

    animation.start(&mut scheduler);
    animation.stop();
    animation.start(&mut scheduler);
    assert_eq!(scheduler.requests, 1);
  }

  #[test]
  fn zero_speed_is_the_identity_rotation() {
    let (mut ctx, mut scene, mut animation) = setup();
    let mut scheduler = CountingScheduler::default();
    animation.start(&mut scheduler);

    animation
      .tick(at(&animation, 3000), &mut scene, &mut ctx, &mut scheduler)
      .unwrap();
    animation.speed_degrees_per_second = 0.0;
    for ms in [3016, 60_000] {
      animation
        .tick(at(&animation, ms), &mut scene, &mut ctx, &mut scheduler)
        .unwrap();
      assert_matrix_eq(scene.transformation, Matrix4::identity());
    }
  }

  #[test]
  fn speed_change_applies_on_the_next_tick() {
    let mut animation = Animation::new(Instant::now(), 20.0);
    let now = at(&animation, 1000);
    assert!((animation.angle_at(now).0 - 20f32.to_radians()).abs() < 1e-6);

    animation.speed_degrees_per_second = 90.0;
    assert!((animation.angle_at(now).0 - PI / 2.0).abs() < 1e-6);
  }

  #[test]
  fn time_before_the_start_counts_as_zero() {
    let animation = Animation::new(Instant::now(), 20.0);
    let earlier = animation.started_at - Duration::from_millis(10);
    assert_eq!(animation.angle_at(earlier), Rad(0.0));
  }

  #[test]
  fn failing_frame_stalls_the_animation() {
    let (mut ctx, mut scene, mut animation) = setup();
    let mut scheduler = CountingScheduler::default();
    animation.start(&mut scheduler);
    ctx.backend_mut().fail_draw_of = Some("stage");

    let result =
      animation.tick(at(&animation, 16), &mut scene, &mut ctx, &mut scheduler);
    assert!(result.is_err());
    assert_eq!(scheduler.requests, 1);
    assert!(animation.is_running());
    assert_eq!(ctx.bound_target(), None);

    // stopping and starting again re-arms the chain
    animation.stop();
    animation.start(&mut scheduler);
    assert_eq!(scheduler.requests, 2);
  }
}
