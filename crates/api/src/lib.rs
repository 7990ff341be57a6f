pub mod db;
mod routes;
mod startup;
mod templates;
mod utils;

pub use db::{
    trailing_year_start, ClimateData, ClimateStore, PrecipReading, Station, TempStats, Tobs,
    DATE_FORMAT, MOST_ACTIVE_STATION,
};
pub use routes::*;
pub use startup::{app, build_app_state, AppState};
pub use utils::{get_config_info, get_log_level, setup_logger, Cli};
