pub mod boundary;
pub mod filter;
pub mod gate;
pub mod matcher;
pub mod names;

pub use boundary::*;
pub use filter::*;
pub use gate::*;
pub use matcher::*;
pub use names::*;
