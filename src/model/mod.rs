//! Model components: standard scaler and OLS linear regression

pub mod linear;
pub mod scaler;

pub use linear::{LinearRegression, LinearRegressionError};
pub use scaler::{ScalerError, StandardScaler};
