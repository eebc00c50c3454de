pub mod faces;
pub mod image_info;
