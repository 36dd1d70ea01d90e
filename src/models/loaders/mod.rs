pub mod curriculum_loader;

pub use curriculum_loader::{load_curriculum, load_curriculum_or_empty, parse_curriculum_value};
