pub mod bubble;
pub mod input_line;
