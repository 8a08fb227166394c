//! Rule-set serialization.

mod fold;
mod serializer;

pub use fold::fold_line;
pub use serializer::{format_instant, serialize};
