use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
  pub position: [f32; 3],
  pub color: [f32; 4],
  pub tex_coords: [f32; 2],
}

impl Vertex {
  pub fn new(position: [f32; 3]) -> Self {
    Self {
      position,
      color: [1.0, 1.0, 1.0, 1.0],
      tex_coords: [0.0, 0.0],
    }
  }

  pub fn with_color(self, color: [f32; 4]) -> Self {
    Self { color, ..self }
  }

  pub fn with_tex_coords(self, tex_coords: [f32; 2]) -> Self {
    Self { tex_coords, ..self }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
  Triangles,
  TriangleStrip,
}

/// CPU-side vertex data, ready to be uploaded by a backend.
#[derive(Debug, Clone)]
pub struct Geometry {
  pub label: &'static str,
  pub primitive: Primitive,
  pub vertices: Vec<Vertex>,
  pub indices: Vec<u32>,
}

impl Geometry {
  /// Geometry drawn in vertex order.
  pub fn sequential(
    label: &'static str,
    primitive: Primitive,
    vertices: Vec<Vertex>,
  ) -> Self {
    let indices = (0..vertices.len() as u32).collect();
    Self {
      label,
      primitive,
      vertices,
      indices,
    }
  }
}

pub fn triangle() -> Geometry {
  let vertices = vec![
    Vertex::new([-0.5, -0.5, 0.0]).with_color([1.0, 0.0, 0.0, 1.0]),
    Vertex::new([0.5, -0.5, 0.0]).with_color([0.0, 1.0, 0.0, 1.0]),
    Vertex::new([0.0, 0.5, 0.0]).with_color([0.0, 0.0, 1.0, 1.0]),
  ];
  Geometry::sequential("triangle", Primitive::Triangles, vertices)
}

/// Axis aligned cube with side 1, centered at the origin.
pub fn cube() -> Geometry {
  const CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
  ];
  // counter-clockwise seen from outside
  const FACES: [[usize; 4]; 6] = [
    [4, 5, 6, 7],
    [1, 0, 3, 2],
    [5, 1, 2, 6],
    [0, 4, 7, 3],
    [7, 6, 2, 3],
    [0, 1, 5, 4],
  ];

  let vertices = FACES
    .iter()
    .flat_map(|[a, b, c, d]| [*a, *b, *c, *a, *c, *d])
    .map(|i| Vertex::new(CORNERS[i]))
    .collect();
  Geometry::sequential("cube", Primitive::Triangles, vertices)
}

/// Open cylinder around the Y axis.
pub fn band(radius: f32, height: f32, segments: u32) -> Geometry {
  let segments = segments.max(3);
  let half = height / 2.0;
  let mut vertices = Vec::with_capacity(2 * (segments as usize + 1));

  for i in 0..=segments {
    let t = i as f32 / segments as f32;
    let (sin, cos) = (t * TAU).sin_cos();
    let (x, z) = (radius * sin, radius * cos);
    vertices.push(Vertex::new([x, half, z]).with_tex_coords([t, 1.0]));
    vertices.push(Vertex::new([x, -half, z]).with_tex_coords([t, 0.0]));
  }

  Geometry::sequential("band", Primitive::TriangleStrip, vertices)
}

/// Quad covering the whole viewport under an identity transform.
pub fn stage() -> Geometry {
  let vertices = vec![
    Vertex::new([-1.0, -1.0, 0.0]).with_tex_coords([0.0, 0.0]),
    Vertex::new([1.0, -1.0, 0.0]).with_tex_coords([1.0, 0.0]),
    Vertex::new([-1.0, 1.0, 0.0]).with_tex_coords([0.0, 1.0]),
    Vertex::new([1.0, 1.0, 0.0]).with_tex_coords([1.0, 1.0]),
  ];
  Geometry::sequential("stage", Primitive::TriangleStrip, vertices)
}
