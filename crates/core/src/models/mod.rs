pub mod chart;
pub mod expense;
pub mod export;
pub mod settings;
pub mod view;
