pub mod analyze;
pub mod model;

// Re-export commonly used types/functions for the CLI
pub use analyze::{analyze_entries, Analysis, Edge, EdgeKind};
pub use model::{labels_from_source, load_hex_image, Line, listing};
