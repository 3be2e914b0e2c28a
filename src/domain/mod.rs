pub mod review;
pub mod sentiment;

pub use review::{LabeledReview, Rejection, Review, ANONYMOUS, DEFAULT_SOURCE, MIN_TEXT_CHARS};
pub use sentiment::{SentimentLabel, SentimentResult};
