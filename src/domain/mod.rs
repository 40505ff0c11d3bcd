pub mod event;
pub mod product;

pub use event::*;
pub use product::*;
