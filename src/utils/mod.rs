// Shared helpers
pub mod numeric;

pub use numeric::num;
