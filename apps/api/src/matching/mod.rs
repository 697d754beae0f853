// Compatibility scoring & ranking engine.
// similarity → scoring → (filter + threshold + sort in ranker). No state survives a request.

pub mod filter;
pub mod handlers;
pub mod ranker;
pub mod scoring;
pub mod similarity;
pub mod store;
