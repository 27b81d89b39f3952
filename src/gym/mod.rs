pub mod crossings;

pub use crossings::Crossings;
