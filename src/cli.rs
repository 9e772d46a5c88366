//! CLI domain: parse, route and presentation for the `frames` binary.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{format_gallery_json, format_gallery_table, GalleryRow};
pub use route::RunContext;
