pub mod model;
pub mod saved;
pub mod server;
