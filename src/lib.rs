//! # sunshade
//!
//! Solar-phase color temperature scheduling for displays.
//!
//! ## Architecture
//!
//! - **Color science**: `backend::gamma` turns a temperature into a whitepoint
//!   and per-output gamma ramps
//! - **Solar events**: `geo` computes dawn, sunrise, sunset and dusk for a day
//!   and latitude, detecting midnight sun and polar night
//! - **Scheduling**: `core::period` plans each day, answers the current target
//!   temperature and the next re-evaluation deadline
//! - **Driver**: `core` applies ramps to the outputs in `core::outputs`
//!   through a `backend::GammaBackend`
//! - **Infrastructure**: configuration, command line parsing, logging, signal
//!   handling and an abstract (real or simulated) time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod backend;
pub mod common;
pub mod config;
pub mod core;
pub mod geo;
pub mod signals;
pub mod time_source;
