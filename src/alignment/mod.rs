pub mod anchor;
pub mod distance;
pub mod estimator;
pub mod similarity;
pub mod walker;
