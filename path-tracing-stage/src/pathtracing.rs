//! The fixed scene the path-tracing fragment shader renders: three
//! spheres inside a cornell box, seen from `eye_position`.

use crate::uniform::UniformAssignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Material {
  /// Emissive.
  pub is_light: bool,
  /// Specular reflection only.
  pub is_perfect_mirror: bool,
  /// Lambertian.
  pub is_diffuse: bool,
}

impl Material {
  pub const LIGHT: Self = Self {
    is_light: true,
    is_perfect_mirror: false,
    is_diffuse: false,
  };
  pub const MIRROR: Self = Self {
    is_light: false,
    is_perfect_mirror: true,
    is_diffuse: false,
  };
  pub const DIFFUSE: Self = Self {
    is_light: false,
    is_perfect_mirror: false,
    is_diffuse: true,
  };

  fn push_assignments(&self, prefix: &str, out: &mut Vec<UniformAssignment>) {
    out.push(UniformAssignment::new(
      format!("{}.isLight", prefix),
      self.is_light,
    ));
    out.push(UniformAssignment::new(
      format!("{}.isPerfectMirror", prefix),
      self.is_perfect_mirror,
    ));
    out.push(UniformAssignment::new(
      format!("{}.isDiffuse", prefix),
      self.is_diffuse,
    ));
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
  pub center: [f32; 3],
  pub radius: f32,
  pub material: Material,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornellBox {
  pub min_corner: [f32; 3],
  pub max_corner: [f32; 3],
  pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathTracingScene {
  pub spheres: [Sphere; 3],
  pub cornell_box: CornellBox,
  pub eye_position: [f32; 3],
}

impl Default for PathTracingScene {
  fn default() -> Self {
    let sphere = |center, material| Sphere {
      center,
      radius: 1.0,
      material,
    };

    Self {
      spheres: [
        sphere([0.0, 0.0, -10.0], Material::LIGHT),
        sphere([-2.5, 0.0, -10.0], Material::MIRROR),
        sphere([2.5, 0.0, -10.0], Material::MIRROR),
      ],
      cornell_box: CornellBox {
        min_corner: [-4.0, -2.0, -12.0],
        max_corner: [4.0, 2.0, 12.0],
        material: Material::DIFFUSE,
      },
      eye_position: [0.0, 0.0, 2.0],
    }
  }
}

impl PathTracingScene {
  /// Flattens the description into the uniform names the shader
  /// declares.
  pub fn assignments(&self) -> Vec<UniformAssignment> {
    let mut out = Vec::new();

    out.push(UniformAssignment::new("eyePosition", self.eye_position));

    for (i, sphere) in self.spheres.iter().enumerate() {
      out.push(UniformAssignment::new(
        format!("spheres[{}].center", i),
        sphere.center,
      ));
      out.push(UniformAssignment::new(
        format!("spheres[{}].radius", i),
        sphere.radius,
      ));
      sphere
        .material
        .push_assignments(&format!("sphereMaterials[{}]", i), &mut out);
    }

    let cornell_box = &self.cornell_box;
    out.push(UniformAssignment::new(
      "cornellBox.minCorner",
      cornell_box.min_corner,
    ));
    out.push(UniformAssignment::new(
      "cornellBox.maxCorner",
      cornell_box.max_corner,
    ));
    cornell_box
      .material
      .push_assignments("cornellBoxMaterial", &mut out);

    out
  }
}
