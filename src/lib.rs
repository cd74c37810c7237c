pub mod algorithms;
pub mod compare;
pub mod config;
pub mod controller;
pub mod grid;
pub mod layout;
pub mod report;
pub mod visualizer;
