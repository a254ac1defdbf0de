//! npt-ix library - index population and corpus counting jobs
//!
//! Jobs over the per-document noun-phrase corpus and the Solr index:
//! bulk indexing, corpus-wide counting, period-totals generation, and
//! ad-hoc date-range window extraction.

pub mod counts;
pub mod indexer;
pub mod npfiles;
pub mod totals_job;
pub mod window;
