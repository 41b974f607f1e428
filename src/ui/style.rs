//! Color and emphasis helpers for terminal output, built on owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for the semantic elements of `ltr` output.
pub struct Style;

impl Style {
    /// Section headers ("Registered models", "Backend")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Field names in key/value listings
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Model names, endpoints and other primary values
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Language codes
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Marker appended to the default model
    pub fn default_marker() -> String {
        format!("{}", "(default)".dimmed())
    }
}
