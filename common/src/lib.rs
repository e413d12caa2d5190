pub mod gl_boilerplate;

pub use gl_boilerplate::{init_display, ContextError};

#[macro_export]
macro_rules! project_asset_path {
  ($name:literal) => {
    concat!(env!("CARGO_MANIFEST_DIR"), "/assets/", $name)
  };
}
