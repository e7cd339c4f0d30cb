pub mod server;

pub use server::{proto, ProductServiceImpl};
