mod part;
mod placement;

pub use part::{Part, PartCatalog};
pub use placement::Placement;
