//! Similarity metrics between a fixed and a transformed moving image.

pub mod huber;
pub mod mean_squares;
pub mod mutual_information;
pub mod trait_;

pub use huber::HuberMetric;
pub use mean_squares::MeanSquaresMetric;
pub use mutual_information::MutualInformationMetric;
pub use trait_::Metric;
