pub mod quote;
pub mod series;
pub mod symbol;
