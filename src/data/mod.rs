pub mod price_csv;
pub mod results_csv;
