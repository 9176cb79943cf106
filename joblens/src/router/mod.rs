pub mod analytics;
pub mod batch;
pub mod fetch;
pub mod reduce;
pub mod util;
