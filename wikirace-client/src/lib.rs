pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{ClientOptions, SolveClient, DEFAULT_ENDPOINT};
pub use error::SolveError;
pub use request::SearchRequest;
pub use response::{SearchResponse, TimeTaken};
