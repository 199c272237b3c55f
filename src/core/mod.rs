pub mod calculator;
pub mod engine;
pub mod pipeline;
pub mod plane;
pub mod raster;
pub mod report;

pub use crate::domain::model::{Analysis, CeaReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
