//! Race data sources for lapdelta
//!
//! Three implementations of the same seam: the live HTTP API, the bundled
//! static samples, and the synthetic lap-time generator of last resort.

pub mod bundled;
pub mod remote;
pub mod source;
pub mod synthetic;

pub use bundled::BundledSource;
pub use remote::{ApiBase, RemoteSource};
pub use source::RaceDataSource;
pub use synthetic::SyntheticSource;
