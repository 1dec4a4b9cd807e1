pub mod catalog_parser;
pub mod dollar_service;
pub mod message_service;
pub mod price_calculator;
