pub mod calendar;
pub mod discovery;
pub mod enrichment;
pub mod genres;
pub mod providers;
pub mod sampler;
pub mod search;

pub use discovery::Discovery;
pub use providers::{CatalogProvider, TmdbCatalog};
