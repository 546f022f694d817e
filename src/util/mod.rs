pub mod formatting;
pub mod ordering;
pub mod parsing;
