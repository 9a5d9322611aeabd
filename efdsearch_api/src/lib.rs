mod client;
mod errors;
mod query;
mod session;
pub mod types;
pub mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{Query, QueryCommon, SearchQuery};
pub use self::session::Session;
