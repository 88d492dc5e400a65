use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Neutral => "NEUTRAL",
        }
    }
}

/// Direction and size of the change between two periods for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Non-negative, rounded to one decimal.
    pub magnitude_percent: f64,
}

impl TrendResult {
    pub const NEUTRAL: TrendResult = TrendResult {
        direction: TrendDirection::Neutral,
        magnitude_percent: 0.0,
    };
}

/// Compare a current sample against the previous one.
///
/// An absent or zero previous value has no meaningful percent change: the
/// result is NEUTRAL 0 when the current value is also absent or zero, and a
/// saturated UP 100 otherwise. For metrics where lower is better (churn),
/// callers pass the arguments swapped. Non-finite samples count as absent.
pub fn trend(current: Option<f64>, previous: Option<f64>) -> TrendResult {
    let current = current.filter(|v| v.is_finite()).unwrap_or(0.0);
    let previous = match previous.filter(|v| v.is_finite()) {
        Some(p) if p != 0.0 => p,
        _ => {
            if current == 0.0 {
                return TrendResult::NEUTRAL;
            }
            return TrendResult {
                direction: TrendDirection::Up,
                magnitude_percent: 100.0,
            };
        }
    };

    let change = (current - previous) / previous * 100.0;
    let direction = if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    TrendResult {
        direction,
        magnitude_percent: round_to(change.abs(), 1),
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_absent_or_zero_is_neutral() {
        assert_eq!(trend(Some(0.0), Some(0.0)), TrendResult::NEUTRAL);
        assert_eq!(trend(None, None), TrendResult::NEUTRAL);
        assert_eq!(trend(None, Some(0.0)), TrendResult::NEUTRAL);
        assert_eq!(trend(Some(0.0), None), TrendResult::NEUTRAL);
    }

    #[test]
    fn test_growth_from_zero_saturates_at_100() {
        let result = trend(Some(5.0), Some(0.0));
        assert_eq!(result.direction, TrendDirection::Up);
        assert_eq!(result.magnitude_percent, 100.0);

        assert_eq!(trend(Some(42.0), None).magnitude_percent, 100.0);
    }

    #[test]
    fn test_drop_to_zero_is_down_100() {
        let result = trend(Some(0.0), Some(5.0));
        assert_eq!(result.direction, TrendDirection::Down);
        assert_eq!(result.magnitude_percent, 100.0);
    }

    #[test]
    fn test_absent_current_with_previous_is_down_100() {
        let result = trend(None, Some(5.0));
        assert_eq!(result.direction, TrendDirection::Down);
        assert_eq!(result.magnitude_percent, 100.0);
    }

    #[test]
    fn test_magnitude_matches_rounded_percent_change() {
        let cases = [
            (120.0, 100.0),
            (80.0, 100.0),
            (1.0, 3.0),
            (1234.56, 987.65),
            (-50.0, 25.0),
            (100.0, 100.0),
        ];
        for (current, previous) in cases {
            let result = trend(Some(current), Some(previous));
            let change: f64 = (current - previous) / previous * 100.0;
            assert_eq!(result.magnitude_percent, (change.abs() * 10.0).round() / 10.0);
            let expected = if change > 0.0 {
                TrendDirection::Up
            } else if change < 0.0 {
                TrendDirection::Down
            } else {
                TrendDirection::Neutral
            };
            assert_eq!(result.direction, expected, "{} vs {}", current, previous);
        }
    }

    #[test]
    fn test_non_finite_samples_count_as_absent() {
        assert_eq!(trend(Some(f64::NAN), Some(5.0)), trend(None, Some(5.0)));
        assert_eq!(trend(Some(5.0), Some(f64::INFINITY)), trend(Some(5.0), None));
        assert_eq!(trend(Some(f64::NAN), Some(f64::NAN)), TrendResult::NEUTRAL);

        let result = trend(Some(f64::NEG_INFINITY), Some(5.0));
        assert_eq!(result.direction, TrendDirection::Down);
        assert_eq!(result.magnitude_percent, 100.0);
    }

    #[test]
    fn test_one_third_rounds_to_one_decimal() {
        let result = trend(Some(4.0), Some(3.0));
        assert_eq!(result.direction, TrendDirection::Up);
        assert_eq!(result.magnitude_percent, 33.3);
    }

    #[test]
    fn test_swapped_arguments_for_lower_is_better() {
        // churn fell from 10% to 8%: good news shows as UP
        let result = trend(Some(10.0), Some(8.0));
        assert_eq!(result.direction, TrendDirection::Up);
        assert_eq!(result.magnitude_percent, 25.0);
    }

    #[test]
    fn test_serializes_uppercase_direction() {
        let json = serde_json::to_value(trend(Some(2.0), Some(1.0))).unwrap();
        assert_eq!(json["direction"], "UP");
        assert_eq!(json["magnitude_percent"], 100.0);
    }
}
