pub mod cursor;
pub mod decoder;

pub use cursor::GeneCursor;
pub use decoder::{bin_index, decode, dimensionality};
