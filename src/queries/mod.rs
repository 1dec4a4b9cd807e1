pub mod client_queries;
pub mod config_queries;
pub mod product_queries;
pub mod sale_queries;
