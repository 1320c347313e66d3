pub mod converter;
pub mod document;
pub mod invoice;
pub mod odt_file;
pub mod placeholder;
pub mod renderer;
pub mod table;
