//! Query modules for each domain table.

pub mod enrichment_failures;
pub mod leads;
pub mod raw_discoveries;
pub mod runs;
pub mod util;
