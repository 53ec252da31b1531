pub mod main;
pub mod record;
pub mod schema;

pub use main::*;
pub use record::*;
pub use schema::*;
