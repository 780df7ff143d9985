/// Console and rolling JSON file logging over `tracing`.
pub mod logsetup;
