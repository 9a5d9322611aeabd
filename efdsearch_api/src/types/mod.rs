mod filter;
pub use self::filter::{FilerType, ReportType};

mod search;
pub use self::search::{SearchResponse, SearchRowColumns};
