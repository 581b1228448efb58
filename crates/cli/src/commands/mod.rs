pub mod convert;
pub mod report;

pub use convert::*;
pub use report::*;
