/// Static field layout of the WS980WiFi response frame
use crate::models::Measurement;

/// Position, width, signedness and scale of one measurement inside the
/// response frame. Offsets and widths are in bytes; the raw integer is
/// big-endian and divided by `scale` to obtain the physical value.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: Measurement,
    pub offset: usize,
    pub width: usize,
    pub signed: bool,
    pub scale: u32,
}

/// The station's fixed field table, in frame order. Only the
/// temperature family can read below zero and is signed; everything
/// else is unsigned.
pub const FIELD_SPECS: [FieldSpec; 21] = [
    spec(Measurement::InsideTemperature, 7, 2, true, 10),
    spec(Measurement::OutsideTemperature, 10, 2, true, 10),
    spec(Measurement::DewPoint, 13, 2, true, 10),
    spec(Measurement::ApparentTemperature, 16, 2, true, 10),
    spec(Measurement::HeatIndex, 19, 2, true, 10),
    spec(Measurement::InsideHumidity, 22, 1, false, 1),
    spec(Measurement::OutsideHumidity, 24, 1, false, 1),
    spec(Measurement::PressureAbsolute, 26, 2, false, 10),
    spec(Measurement::PressureRelative, 29, 2, false, 10),
    spec(Measurement::WindDirection, 32, 2, false, 1),
    spec(Measurement::WindSpeed, 35, 2, false, 10),
    spec(Measurement::Gust, 38, 2, false, 10),
    spec(Measurement::Rain, 41, 4, false, 10),
    spec(Measurement::RainDay, 46, 4, false, 10),
    spec(Measurement::RainWeek, 51, 4, false, 10),
    spec(Measurement::RainMonth, 56, 4, false, 10),
    spec(Measurement::RainYear, 61, 4, false, 10),
    spec(Measurement::RainTotal, 66, 4, false, 10),
    spec(Measurement::Light, 71, 4, false, 10),
    spec(Measurement::UvValue, 76, 2, false, 10),
    spec(Measurement::UvIndex, 79, 1, false, 1),
];

const fn spec(key: Measurement, offset: usize, width: usize, signed: bool, scale: u32) -> FieldSpec {
    FieldSpec {
        key,
        offset,
        width,
        signed,
        scale,
    }
}

impl Measurement {
    /// The field spec for this measurement. Enum order matches table
    /// order, verified by test.
    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[*self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decoder::EXPECTED_FRAME_LEN;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, m) in Measurement::ALL.iter().enumerate() {
            assert_eq!(FIELD_SPECS[i].key, *m);
            assert_eq!(m.spec().key, *m);
        }
    }

    #[test]
    fn test_fields_fit_in_frame() {
        for spec in &FIELD_SPECS {
            assert!(
                spec.offset + spec.width <= EXPECTED_FRAME_LEN,
                "{} extends past the frame end",
                spec.key
            );
            assert!(matches!(spec.width, 1 | 2 | 4));
        }
    }

    #[test]
    fn test_only_temperatures_are_signed() {
        for spec in &FIELD_SPECS {
            let is_temperature = matches!(
                spec.key,
                Measurement::InsideTemperature
                    | Measurement::OutsideTemperature
                    | Measurement::DewPoint
                    | Measurement::ApparentTemperature
                    | Measurement::HeatIndex
            );
            assert_eq!(spec.signed, is_temperature, "{}", spec.key);
        }
    }
}
