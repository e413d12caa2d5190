use std::collections::BTreeMap;
use std::fmt;

use cgmath::{Matrix4, Vector3};

use crate::{Error, Result};

/// Declared GLSL type of a uniform, as far as this renderer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
  Float,
  Bool,
  Vec3,
  Mat4,
  Sampler2d,
  /// Any other GLSL type. Nothing can be assigned to it.
  Other,
}

impl UniformKind {
  /// Number of scalar components a value of this kind carries.
  pub fn components(self) -> Option<usize> {
    match self {
      UniformKind::Float | UniformKind::Bool => Some(1),
      UniformKind::Vec3 => Some(3),
      UniformKind::Mat4 => Some(16),
      UniformKind::Sampler2d | UniformKind::Other => None,
    }
  }
}

impl fmt::Display for UniformKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      UniformKind::Float => "float",
      UniformKind::Bool => "bool",
      UniformKind::Vec3 => "vec3",
      UniformKind::Mat4 => "mat4",
      UniformKind::Sampler2d => "sampler2D",
      UniformKind::Other => "an unsupported type",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
  Float(f32),
  Bool(bool),
  Vec3([f32; 3]),
  /// Column-major.
  Mat4([[f32; 4]; 4]),
}

impl UniformValue {
  pub fn kind(&self) -> UniformKind {
    match self {
      UniformValue::Float(_) => UniformKind::Float,
      UniformValue::Bool(_) => UniformKind::Bool,
      UniformValue::Vec3(_) => UniformKind::Vec3,
      UniformValue::Mat4(_) => UniformKind::Mat4,
    }
  }

  /// Builds a value of `kind` from a flat list of scalars. Matrices are
  /// read column by column, bools are true when non-zero.
  pub fn from_components(kind: UniformKind, data: &[f32]) -> Result<Self> {
    let value = match (kind, data) {
      (UniformKind::Float, &[x]) => UniformValue::Float(x),
      (UniformKind::Bool, &[x]) => UniformValue::Bool(x != 0.0),
      (UniformKind::Vec3, &[x, y, z]) => UniformValue::Vec3([x, y, z]),
      (UniformKind::Mat4, data) if data.len() == 16 => {
        let mut m = [[0.0; 4]; 4];
        for (i, x) in data.iter().enumerate() {
          m[i / 4][i % 4] = *x;
        }
        UniformValue::Mat4(m)
      }
      _ => {
        return Err(Error::UniformArity {
          kind,
          expected: kind.components().unwrap_or(0),
          found: data.len(),
        })
      }
    };
    Ok(value)
  }
}

impl From<f32> for UniformValue {
  fn from(x: f32) -> Self {
    UniformValue::Float(x)
  }
}

impl From<bool> for UniformValue {
  fn from(b: bool) -> Self {
    UniformValue::Bool(b)
  }
}

impl From<[f32; 3]> for UniformValue {
  fn from(v: [f32; 3]) -> Self {
    UniformValue::Vec3(v)
  }
}

impl From<Vector3<f32>> for UniformValue {
  fn from(v: Vector3<f32>) -> Self {
    UniformValue::Vec3(v.into())
  }
}

impl From<Matrix4<f32>> for UniformValue {
  fn from(m: Matrix4<f32>) -> Self {
    UniformValue::Mat4(m.into())
  }
}

/// A named uniform and the value to assign to it.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformAssignment {
  pub name: String,
  pub value: UniformValue,
}

impl UniformAssignment {
  pub fn new(name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
    Self {
      name: name.into(),
      value: value.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformEntry<T> {
  Value(UniformValue),
  Sampler { unit: u32, texture: T },
}

/// Uniform state of one program. Values stay assigned across frames
/// until overwritten, the way GL keeps them in the program object.
#[derive(Debug, Clone)]
pub struct UniformTable<T> {
  entries: BTreeMap<String, UniformEntry<T>>,
}

impl<T> Default for UniformTable<T> {
  fn default() -> Self {
    Self {
      entries: BTreeMap::new(),
    }
  }
}

impl<T> UniformTable<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_value(&mut self, name: &str, value: UniformValue) {
    self.insert(name, UniformEntry::Value(value));
  }

  pub fn set_sampler(&mut self, name: &str, unit: u32, texture: T) {
    self.insert(name, UniformEntry::Sampler { unit, texture });
  }

  fn insert(&mut self, name: &str, entry: UniformEntry<T>) {
    match self.entries.get_mut(name) {
      Some(slot) => *slot = entry,
      None => {
        self.entries.insert(name.to_owned(), entry);
      }
    }
  }

  pub fn get(&self, name: &str) -> Option<&UniformEntry<T>> {
    self.entries.get(name)
  }

  pub fn value(&self, name: &str) -> Option<UniformValue> {
    match self.entries.get(name)? {
      UniformEntry::Value(value) => Some(*value),
      UniformEntry::Sampler { .. } => None,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformEntry<T>)> {
    self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::SquareMatrix as _;

  #[test]
  fn from_components_checks_arity() {
    let err = UniformValue::from_components(UniformKind::Vec3, &[1.0, 2.0])
      .unwrap_err();
    assert!(matches!(
      err,
      Error::UniformArity {
        kind: UniformKind::Vec3,
        expected: 3,
        found: 2
      }
    ));

    let v = UniformValue::from_components(UniformKind::Vec3, &[1.0, 2.0, 3.0])
      .unwrap();
    assert_eq!(v, UniformValue::Vec3([1.0, 2.0, 3.0]));
  }

  #[test]
  fn from_components_reads_matrices_column_major() {
    let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let v = UniformValue::from_components(UniformKind::Mat4, &data).unwrap();
    let UniformValue::Mat4(m) = v else {
      panic!("expected a matrix, got {:?}", v);
    };
    assert_eq!(m[0], [0.0, 1.0, 2.0, 3.0]);
    assert_eq!(m[3], [12.0, 13.0, 14.0, 15.0]);
  }

  #[test]
  fn samplers_take_no_raw_components() {
    let err = UniformValue::from_components(UniformKind::Sampler2d, &[0.0])
      .unwrap_err();
    assert!(matches!(err, Error::UniformArity { expected: 0, .. }));
  }

  #[test]
  fn bool_from_components() {
    let v = UniformValue::from_components(UniformKind::Bool, &[1.0]).unwrap();
    assert_eq!(v, UniformValue::Bool(true));
  }

  #[test]
  fn matrix_conversion_keeps_columns() {
    let m = Matrix4::from_translation(Vector3::new(1.0_f32, 2.0, 3.0));
    let UniformValue::Mat4(cols) = UniformValue::from(m) else {
      unreachable!()
    };
    assert_eq!(cols[3], [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(
      UniformValue::from(Matrix4::<f32>::identity()).kind(),
      UniformKind::Mat4
    );
  }

  #[test]
  fn table_overwrites_entries() {
    let mut table: UniformTable<()> = UniformTable::new();
    table.set_value("t", UniformValue::Float(1.0));
    table.set_value("t", UniformValue::Float(2.0));
    assert_eq!(table.len(), 1);
    assert_eq!(table.value("t"), Some(UniformValue::Float(2.0)));

    table.set_sampler("t", 0, ());
    assert_eq!(table.value("t"), None);
    assert!(matches!(
      table.get("t"),
      Some(UniformEntry::Sampler { unit: 0, .. })
    ));
  }
}
