pub mod active;
pub mod adapter;
pub mod data_source;
pub mod error;
pub mod geometry;
pub mod io;
pub mod operator;
pub mod panel;
pub mod settings;
pub mod signal;
pub mod tilt;
pub mod view;
