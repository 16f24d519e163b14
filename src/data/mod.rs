mod headless_host;
mod memory_storage;
mod rest_query;
mod sled_storage;

pub use headless_host::*;
pub use memory_storage::*;
pub use rest_query::*;
pub use sled_storage::*;
