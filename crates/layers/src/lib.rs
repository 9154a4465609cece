pub mod boundaries;
pub mod highlight;
pub mod layer;
pub mod markers;
pub mod symbology;

pub use boundaries::*;
pub use highlight::*;
pub use layer::*;
pub use markers::*;
pub use symbology::*;
