pub mod vocab;
pub mod types;
pub mod extractor;

pub use vocab::*;
pub use types::*;
pub use extractor::*;
