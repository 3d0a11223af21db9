pub mod config;
pub mod error;
pub mod logging;
pub mod process;
pub mod table;

pub use config::Config;
pub use error::MetaError;
pub use table::Table;
