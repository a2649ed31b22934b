use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use miqat_core::{CustomTimes, HighLatitudeRule, Prayer, PrayerInputs};

#[derive(Parser)]
#[command(name = "miqat", about = "Islamic prayer times", version)]
pub struct Cli {
    /// Preferences file (JSON). Falls back to $MIQAT_PREFERENCES.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// The five prayer times for a day
    Times {
        #[command(flatten)]
        inputs: InputArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Full solar day: prayers, sunrise, sunset and night markers
    Schedule {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        json: bool,
    },
    /// Live countdown to the next prayer
    Next {
        #[command(flatten)]
        inputs: InputArgs,
        /// Stop after this many updates (runs until Ctrl-C when omitted)
        #[arg(long)]
        ticks: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// List calculation methods and their parameters
    Methods,
}

/// Engine inputs given on the command line. Anything left out comes from
/// the preferences file.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Calendar date (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Calculation method key, e.g. MuslimWorldLeague or Makkah
    #[arg(long)]
    pub method: Option<String>,
    /// Asr convention: 0 = standard, 1 = Hanafi
    #[arg(long)]
    pub asr_method: Option<i64>,
    /// Manual override, e.g. fajr=05:10 (repeatable)
    #[arg(long = "custom", value_parser = parse_custom)]
    pub custom: Vec<(Prayer, String)>,
    /// UTC offset (+03:00, -0500, 5.5), default the host offset
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,
    /// High-latitude rule: angle-based, middle-of-the-night, seventh-of-the-night
    #[arg(long)]
    pub high_lat: Option<HighLatitudeRule>,
    /// Use the fasting-month Isha interval where the method has one
    #[arg(long)]
    pub fasting_month: bool,
}

impl InputArgs {
    pub fn to_inputs(&self) -> PrayerInputs {
        PrayerInputs {
            date: self.date,
            latitude: self.lat,
            longitude: self.lon,
            calculation_method: self.method.clone(),
            asr_method: self.asr_method,
            custom_times: self.custom.iter().cloned().collect::<CustomTimes>(),
            utc_offset: self.utc_offset.clone(),
            high_latitude_rule: self.high_lat,
            fasting_month: self.fasting_month,
        }
    }
}

/// Parse `prayer=value`.
pub fn parse_custom(s: &str) -> Result<(Prayer, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected prayer=HH:MM, got {s:?}"))?;
    let prayer: Prayer = name.parse()?;
    Ok((prayer, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_flag_parses() {
        assert_eq!(
            parse_custom("fajr=05:10").unwrap(),
            (Prayer::Fajr, "05:10".to_string())
        );
        assert_eq!(
            parse_custom("Isha= 22:00 (BST)").unwrap(),
            (Prayer::Isha, "22:00 (BST)".to_string())
        );
        assert!(parse_custom("fajr").is_err());
        assert!(parse_custom("sunrise=06:00").is_err());
    }

    #[test]
    fn times_command_collects_inputs() {
        let cli = Cli::try_parse_from([
            "miqat",
            "times",
            "--date",
            "2024-03-20",
            "--lat",
            "21.4225",
            "--lon",
            "39.8262",
            "--method",
            "Makkah",
            "--asr-method",
            "0",
            "--custom",
            "fajr=05:10",
            "--utc-offset",
            "-05:00",
            "--high-lat",
            "seventh-of-the-night",
            "--fasting-month",
            "--json",
        ])
        .unwrap();
        let Commands::Times { inputs, json } = cli.command else {
            panic!("expected times");
        };
        assert!(json);
        let i = inputs.to_inputs();
        assert_eq!(i.date, NaiveDate::from_ymd_opt(2024, 3, 20));
        assert_eq!(i.latitude, Some(21.4225));
        assert_eq!(i.calculation_method.as_deref(), Some("Makkah"));
        assert_eq!(i.asr_method, Some(0));
        assert_eq!(i.custom_times.get(Prayer::Fajr), Some("05:10"));
        assert_eq!(i.utc_offset.as_deref(), Some("-05:00"));
        assert_eq!(i.high_latitude_rule, Some(HighLatitudeRule::SeventhOfTheNight));
        assert!(i.fasting_month);
    }

    #[test]
    fn negative_longitude_accepted() {
        let cli = Cli::try_parse_from(["miqat", "next", "--lon", "-74.006", "--ticks", "3"]).unwrap();
        let Commands::Next { inputs, ticks, .. } = cli.command else {
            panic!("expected next");
        };
        assert_eq!(inputs.lon, Some(-74.006));
        assert_eq!(ticks, Some(3));
    }

    #[test]
    fn config_is_global() {
        let cli = Cli::try_parse_from(["miqat", "methods", "--config", "prefs.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("prefs.json")));
    }
}
