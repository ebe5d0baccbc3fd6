//! A small Rust wrapper for the OpenLigaDB Sportsdata webservice. See
//! [`Sportsdata`] for the operations and a usage example.

mod error;
mod record;
mod soap;
mod sportsdata;

pub use error::Error;
pub use record::Record;
pub use soap::TARGET_NAMESPACE;
pub use sportsdata::{Sportsdata, DEFAULT_ENDPOINT};
