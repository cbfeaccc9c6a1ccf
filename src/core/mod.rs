pub mod logging;
pub mod sink;
