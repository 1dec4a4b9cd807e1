mod client;
mod message;
mod product;
mod rates;
mod sale;

pub use client::*;
pub use message::*;
pub use product::*;
pub use rates::*;
pub use sale::*;
