pub mod context;
pub mod managed;
pub mod traits;
pub mod utils;
