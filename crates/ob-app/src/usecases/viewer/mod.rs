mod data_viewer;

pub use data_viewer::{DataViewer, ViewerSnapshot};
