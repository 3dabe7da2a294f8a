//! threatglobe library: feed client, normalization pipeline, renderers.

pub mod colors;
pub mod feed;
pub mod help;
pub mod intel;
pub mod scene;
pub mod settings;
pub mod terminal;
pub mod viz;
