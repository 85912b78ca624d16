//! Rectangle reconstruction over the vectorized primitives and the index.

mod extend;
mod options;
mod search;

#[cfg(test)]
mod tests;

pub use options::RectOptions;
pub use search::detect_rectangles;
