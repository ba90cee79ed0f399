#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;

pub mod api;
pub mod app;
pub mod config;
pub mod geolocation;
pub mod import_data;
pub mod logs;
pub mod map_view;
pub mod path;
pub mod position;
pub mod renderer;
pub mod screen;
pub mod theme;
pub mod tracking;
pub mod utils;
