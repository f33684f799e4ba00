pub mod palette;
pub mod resource;
pub mod store;

pub use palette::*;
pub use resource::*;
pub use store::*;
