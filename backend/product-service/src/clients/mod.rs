pub mod http;

pub use http::HttpUserDirectory;
