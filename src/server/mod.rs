pub mod builder;
pub mod handler;
pub mod listener;

pub use builder::{Server, ServerBuilder, ServerTimeouts};
pub use handler::RequestHandler;
