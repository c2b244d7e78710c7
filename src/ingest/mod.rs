pub mod extractor;

pub use extractor::{extract, DirectEntries, EmailDomains, ExtractError, ExtractionPolicy};
