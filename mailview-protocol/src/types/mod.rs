pub mod address;
pub mod chunk;
pub mod element;
pub mod message;
pub mod tag;

pub use address::*;
pub use chunk::*;
pub use element::*;
pub use message::*;
pub use tag::*;
