pub mod carve;
pub mod decompile;
pub mod extract;
pub mod offsets;
pub mod scan;
pub mod workspace;

pub use carve::*;
pub use decompile::*;
pub use extract::*;
pub use offsets::*;
pub use scan::*;
pub use workspace::*;
