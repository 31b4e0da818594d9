pub mod discovery;
pub mod input;
pub mod output;

pub use discovery::*;
pub use input::*;
pub use output::*;
