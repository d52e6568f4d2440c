use chrono::NaiveDate;
use clap::Parser;
use orrery::OrreryConfig;
use std::path::PathBuf;
use std::time::Duration;

/// `orrery` - An interactive 3D view of the solar system over 1800-2099.
///
/// Bodies are placed from a precomputed ephemeris sampled every five days.
/// A date slider and a playback timer move through time; two clicked bodies
/// can be measured against each other.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Body catalog: name -> optional render radius (km) and color.
    #[arg(long, env = "ORRERY_CATALOG", default_value = "data/planet_properties.json")]
    pub catalog: PathBuf,

    /// Ephemeris: "YYYY-MM-DD" -> body -> [x, y, z] in km.
    #[arg(long, env = "ORRERY_POSITIONS", default_value = "data/planet_positions.json")]
    pub positions: PathBuf,

    /// Kilometres per scene unit.
    #[arg(long, env = "ORRERY_SCALING_FACTOR", default_value_t = 1e6, value_parser = positive_f64)]
    pub scaling_factor: f64,

    /// Camera distance (km) at which spheres collapse into points.
    #[arg(long, env = "ORRERY_VISIBILITY_DISTANCE", default_value_t = 5e9, value_parser = positive_f64)]
    pub visibility_distance: f64,

    /// Wall-clock milliseconds between playback steps.
    #[arg(
        long,
        env = "ORRERY_PLAYBACK_PERIOD_MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub playback_period_ms: u64,

    /// Body fixed at the origin.
    #[arg(long, env = "ORRERY_CENTRAL_BODY", default_value = "Sun")]
    pub central_body: String,

    /// Start date (YYYY-MM-DD). Defaults to the current UTC date.
    #[arg(long, env = "ORRERY_TODAY")]
    pub today: Option<NaiveDate>,
}

/// Accepts finite values greater than zero.
fn positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a finite number greater than zero, got {value}"))
    }
}

impl Config {
    /// Core settings derived from the command line.
    pub fn orrery_config(&self) -> OrreryConfig {
        OrreryConfig {
            scaling_factor: self.scaling_factor,
            visibility_distance: self.visibility_distance,
            central_body: self.central_body.clone(),
            playback_period: Duration::from_millis(self.playback_period_ms),
            ..OrreryConfig::default()
        }
    }

    pub fn initial_date(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dataset_conventions() {
        let config = Config::parse_from(["orrery"]);
        let core = config.orrery_config();

        assert_eq!(core.scaling_factor, 1e6);
        assert_eq!(core.visibility_distance, 5e9);
        assert_eq!(core.central_body, "Sun");
        assert_eq!(core.playback_period, Duration::from_millis(100));
        assert_eq!(core.distance_unit, "Million km");
    }

    #[test]
    fn explicit_today_overrides_clock() {
        let config = Config::parse_from(["orrery", "--today", "1969-07-20"]);
        assert_eq!(
            config.initial_date(),
            NaiveDate::from_ymd_opt(1969, 7, 20).unwrap()
        );
    }

    #[test]
    fn rejects_non_positive_numbers() {
        for args in [
            ["orrery", "--scaling-factor", "0"],
            ["orrery", "--scaling-factor", "-1e6"],
            ["orrery", "--visibility-distance", "0"],
            ["orrery", "--visibility-distance", "inf"],
            ["orrery", "--playback-period-ms", "0"],
        ] {
            assert!(Config::try_parse_from(args).is_err(), "{args:?} was accepted");
        }

        let config = Config::parse_from(["orrery", "--scaling-factor", "1e3"]);
        assert_eq!(config.scaling_factor, 1e3);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Config::try_parse_from(["orrery", "--today", "20th July"]).is_err());
    }
}
