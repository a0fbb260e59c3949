pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::anchor::Anchor;
pub use alignment::similarity::SimilarityScorer;
pub use config::AlignConfig;
pub use error::AlignError;
pub use pipeline::builder::PhoneticAlignerBuilder;
pub use pipeline::defaults::{GreedyWalker, RobustOffsetEstimator, WindowedAnchorFinder};
pub use pipeline::runtime::{align, PhoneticAligner};
pub use pipeline::traits::{AnchorFinder, OffsetEstimator, PathWalker};
pub use types::{shift_chunks, Alignment, Chunk, MatchKind, MatchPoint};
