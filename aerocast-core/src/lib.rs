//! Core library for the AeroCast weather assistant.
//!
//! This crate defines:
//! - Configuration & credentials handling (`GEMINI_API_KEY`, config file)
//! - A thin client for the Gemini generate-content API
//! - Weather operations built on top of it, with search grounding
//! - Shared domain models (requests, reports, typed errors)
//!
//! It is used by `aerocast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod gemini;
pub mod model;
pub mod weather;

pub use config::{API_KEY_ENV, Config, GeminiConfig};
pub use error::{Error, Result};
pub use gemini::{GeminiClient, GenerateRequest, GenerateResponse};
pub use model::{Source, WeatherReport};
pub use weather::WeatherSource;
