pub mod aggregate;
pub mod distribution;
pub mod io;
pub mod profiling;
pub mod sampling;
pub mod special;
pub mod types;

pub use aggregate::{group_by_store, store_count};
pub use distribution::{combined_histogram, summarise_by_store};
pub use io::{load_df, load_records, records_from_df, typed_frame};
pub use profiling::{describe, overview};
pub use sampling::{estimate_sample_sizes, required_sample_size, z_critical};
pub use special::inverse_standard_normal_cdf;
pub use types::{
    Bin, BoxplotSummary, ColumnDescription, ColumnInfo, DatasetOverview, DensityPoint,
    DistributionSummary, Record, SampleSizeEstimate, SamplingPlan, SigmaPolicy, StoreStatistics,
};
