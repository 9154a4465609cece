pub mod documents;
pub mod gazetteer;
pub mod regions;

pub use documents::*;
pub use gazetteer::*;
pub use regions::*;
