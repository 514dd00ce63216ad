pub mod alphabeta;
pub mod delta;
pub mod eval;
pub mod pst;

pub use alphabeta::{SearchParams, SearchResult, Searcher};
