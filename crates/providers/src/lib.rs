//! External collaborators: the Gemini outfit suggester and the wttr.in
//! weather reporter. Both speak plain reqwest; the traits they implement
//! live in fitcheck-core so the bot never sees an HTTP client.

pub mod gemini;
pub mod weather;

pub use gemini::GeminiSuggester;
pub use weather::WttrWeather;
