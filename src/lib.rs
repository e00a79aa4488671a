//! Runs a small rendering core inside a plain Win32 window, drawing with GDI.

pub mod app;
pub mod config;
pub mod driver;
pub mod gui;
pub mod windowing;
