pub mod chart;
pub mod market;
pub mod signals;

pub use chart::*;
pub use market::*;
pub use signals::*;
