pub mod server;

pub use server::{proto, UserServiceImpl};
