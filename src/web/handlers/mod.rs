pub mod list_handlers;
pub mod search_handlers;
pub mod system_handlers;

pub use list_handlers::*;
pub use search_handlers::*;
pub use system_handlers::*;
