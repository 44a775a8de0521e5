pub mod controller;
pub mod crawler;
pub mod web;

pub use controller::CrawlController;
pub use crawler::{InterventionGate, ListingBrowser};
pub use web::{StdinGate, WebBrowser};
