pub mod background;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod labels;

pub use background::{estimate_background, BackgroundModel};
pub use catalog::{measure_objects, ObjectStats};
pub use config::DetectionConfig;
pub use filter::{filter_tree, Segmentation};
pub use labels::{build_label_map, relabel};
