pub mod book;
pub mod error;
pub mod payload;
pub mod reference;

pub use book::*;
pub use error::*;
pub use payload::*;
pub use reference::*;
