pub mod at_risk;
pub mod auth_status;
pub mod autofill;
pub mod badge;
pub mod main;
pub mod tab_tracking;
