pub mod chart_service;
pub mod expense_service;
pub mod export_service;
pub mod list_service;
pub mod totals_service;
