pub mod entity;
pub mod form;
pub mod sequence;
pub mod slug;
pub mod tool;

pub use entity::*;
pub use form::*;
pub use sequence::*;
pub use tool::*;
