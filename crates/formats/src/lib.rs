pub mod boundary;
pub mod gazetteer;

pub use boundary::*;
pub use gazetteer::*;
