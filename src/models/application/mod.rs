pub mod application_row;
