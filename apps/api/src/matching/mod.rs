//! Query-driven job matching: string similarity, fused scoring, and result sets.

pub mod engine;
pub mod handlers;
pub mod sequence;
pub mod similarity;
pub mod sort;
