pub mod decision;
pub mod exon_map;
pub mod gene;
pub mod segment;

pub use decision::*;
pub use exon_map::*;
pub use gene::*;
pub use segment::*;
