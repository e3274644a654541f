pub mod endpoint;
pub mod schema;
pub mod spec;

pub use endpoint::*;
pub use schema::*;
pub use spec::*;
