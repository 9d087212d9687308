pub mod maps;
pub mod settings;

pub use settings::{AdminSettings, AppConfig, DashboardSettings, DatabaseSettings, RankingSettings};
