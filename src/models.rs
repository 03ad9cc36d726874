use std::fmt;
use std::str::FromStr;

/// One measurement exposed by the WS980WiFi station, in the order the
/// fields appear in the response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    InsideTemperature,
    OutsideTemperature,
    DewPoint,
    ApparentTemperature,
    HeatIndex,
    InsideHumidity,
    OutsideHumidity,
    PressureAbsolute,
    PressureRelative,
    WindDirection,
    WindSpeed,
    Gust,
    Rain,
    RainDay,
    RainWeek,
    RainMonth,
    RainYear,
    RainTotal,
    Light,
    UvValue,
    UvIndex,
}

impl Measurement {
    /// All measurements in frame order.
    pub const ALL: [Measurement; 21] = [
        Measurement::InsideTemperature,
        Measurement::OutsideTemperature,
        Measurement::DewPoint,
        Measurement::ApparentTemperature,
        Measurement::HeatIndex,
        Measurement::InsideHumidity,
        Measurement::OutsideHumidity,
        Measurement::PressureAbsolute,
        Measurement::PressureRelative,
        Measurement::WindDirection,
        Measurement::WindSpeed,
        Measurement::Gust,
        Measurement::Rain,
        Measurement::RainDay,
        Measurement::RainWeek,
        Measurement::RainMonth,
        Measurement::RainYear,
        Measurement::RainTotal,
        Measurement::Light,
        Measurement::UvValue,
        Measurement::UvIndex,
    ];

    /// Stable key used in configuration and change notifications.
    pub fn key(&self) -> &'static str {
        match self {
            Measurement::InsideTemperature => "inside_temperature",
            Measurement::OutsideTemperature => "outside_temperature",
            Measurement::DewPoint => "dew_point",
            Measurement::ApparentTemperature => "apparent_temperature",
            Measurement::HeatIndex => "heat_index",
            Measurement::InsideHumidity => "inside_humidity",
            Measurement::OutsideHumidity => "outside_humidity",
            Measurement::PressureAbsolute => "pressure_absolute",
            Measurement::PressureRelative => "pressure_relative",
            Measurement::WindDirection => "wind_direction",
            Measurement::WindSpeed => "wind_speed",
            Measurement::Gust => "gust",
            Measurement::Rain => "rain",
            Measurement::RainDay => "rain_day",
            Measurement::RainWeek => "rain_week",
            Measurement::RainMonth => "rain_month",
            Measurement::RainYear => "rain_year",
            Measurement::RainTotal => "rain_total",
            Measurement::Light => "light",
            Measurement::UvValue => "uv_value",
            Measurement::UvIndex => "uv_index",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Measurement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measurement::ALL
            .iter()
            .find(|m| m.key() == s)
            .copied()
            .ok_or_else(|| format!("unknown measurement '{}'", s))
    }
}

/// One decoded field from a station response frame.
///
/// `value` is `None` when the field carried a sentinel pattern (sensor
/// not installed) or the frame was unusable. `raw_hex` keeps the raw
/// slice for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedReading {
    pub key: Measurement,
    pub value: Option<f64>,
    pub raw_hex: String,
}
