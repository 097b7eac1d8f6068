pub mod attachment_file;
pub mod attachment_listing;
