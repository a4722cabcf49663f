pub mod badge_api;
pub mod browser;
pub mod cipher;

#[cfg(test)]
pub mod mock;
