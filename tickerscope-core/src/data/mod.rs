//! Price-history providers and canonicalization

pub mod canonicalize;
pub mod csv_import;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{CanonicalBars, Canonicalizer};
pub use csv_import::CsvProvider;
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar, StaticProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
