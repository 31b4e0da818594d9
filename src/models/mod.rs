pub mod document;
pub mod tier;
pub mod timeline;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::*;
pub use tier::*;
pub use timeline::*;
