// Numeric helpers behind the sample window
// Percentage-change normalization and least-squares trend fitting

pub mod linear_regression;
pub mod percentage_change;

pub use linear_regression::{fit_line, slope_to_angle};
pub use percentage_change::{percent_of, sub_window_relative_change, window_relative_change};
