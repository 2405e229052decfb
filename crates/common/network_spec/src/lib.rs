pub mod networks;
pub mod parser;
