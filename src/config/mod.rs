//! Configuration module for Scout.
//!
//! Handles loading and saving application settings, including the canned-answer
//! table used by the static responder.

mod settings;

pub use settings::{
    GeneralSettings, HttpSettings, ResponderSettings, ScholarSettings, Settings,
    WebSearchSettings,
};
