pub mod ingest;
pub mod model;
pub mod store;
pub mod traits;

// Re-export common types for convenience
pub use ingest::*;
pub use model::*;
pub use store::*;
pub use traits::*;
