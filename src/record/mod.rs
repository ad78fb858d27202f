pub mod types;
pub mod store;
pub mod loader;

pub use types::*;
pub use store::*;
pub use loader::*;
