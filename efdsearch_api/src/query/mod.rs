mod common;
pub use self::common::{Query, QueryCommon};

mod search;
pub use self::search::SearchQuery;
