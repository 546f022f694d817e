pub mod returns;
pub mod volatility;
