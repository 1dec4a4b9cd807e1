pub mod contacts;
pub mod extractors;
pub mod hash;
