pub mod auth;
pub mod badge;
pub mod icon;
pub mod priority;
pub mod settings;
pub mod tab;
