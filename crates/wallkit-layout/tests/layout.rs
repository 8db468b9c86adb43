#[path = "layout/blueprint_scenarios.rs"]
mod blueprint_scenarios;
#[path = "layout/export.rs"]
mod export;
#[path = "layout/properties.rs"]
mod properties;
