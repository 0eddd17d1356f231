//! Daily rainfall severity

use serde::{Deserialize, Serialize};

/// Upper bounds (inclusive, mm) of every bucket except the last
pub const RAINFALL_THRESHOLDS_MM: [f64; 4] = [0.0, 10.0, 30.0, 70.0];

/// Ordered severity label for a day's rainfall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBucket {
    /// Exactly 0 mm
    None,
    /// (0, 10] mm
    Weak,
    /// (10, 30] mm
    Moderate,
    /// (30, 70] mm
    Strong,
    /// Above 70 mm
    VeryStrong,
}

/// Treat negative sensor readings as no rain
pub fn clamp_rainfall(mm: f64) -> f64 {
    if mm < 0.0 {
        0.0
    } else {
        mm
    }
}

impl RainfallBucket {
    /// Bucket a rainfall amount. Negative input is clamped to zero first.
    ///
    /// Bins are closed on the right: 10 mm is still `Weak`.
    pub fn classify(mm: f64) -> Self {
        let mm = clamp_rainfall(mm);
        let [none, weak, moderate, strong] = RAINFALL_THRESHOLDS_MM;
        if mm <= none {
            RainfallBucket::None
        } else if mm <= weak {
            RainfallBucket::Weak
        } else if mm <= moderate {
            RainfallBucket::Moderate
        } else if mm <= strong {
            RainfallBucket::Strong
        } else {
            RainfallBucket::VeryStrong
        }
    }

    /// Snake-case identifier, same as the serialized form
    pub fn id(&self) -> &'static str {
        match self {
            RainfallBucket::None => "none",
            RainfallBucket::Weak => "weak",
            RainfallBucket::Moderate => "moderate",
            RainfallBucket::Strong => "strong",
            RainfallBucket::VeryStrong => "very_strong",
        }
    }

    /// Category string the call-count pipeline was fitted on
    pub fn label_ko(&self) -> &'static str {
        match self {
            RainfallBucket::None => "없음",
            RainfallBucket::Weak => "약한 비",
            RainfallBucket::Moderate => "보통 비",
            RainfallBucket::Strong => "강한 비",
            RainfallBucket::VeryStrong => "매우 강한 비",
        }
    }
}

impl std::fmt::Display for RainfallBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainfallBucket::None => write!(f, "None"),
            RainfallBucket::Weak => write!(f, "Weak"),
            RainfallBucket::Moderate => write!(f, "Moderate"),
            RainfallBucket::Strong => write!(f, "Strong"),
            RainfallBucket::VeryStrong => write!(f, "Very Strong"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negative_rainfall_is_none() {
        assert_eq!(clamp_rainfall(-5.0), 0.0);
        assert_eq!(RainfallBucket::classify(-5.0), RainfallBucket::None);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RainfallBucket::classify(0.0), RainfallBucket::None);
        assert_eq!(RainfallBucket::classify(0.1), RainfallBucket::Weak);
        assert_eq!(RainfallBucket::classify(10.0), RainfallBucket::Weak);
        assert_eq!(RainfallBucket::classify(10.01), RainfallBucket::Moderate);
        assert_eq!(RainfallBucket::classify(30.0), RainfallBucket::Moderate);
        assert_eq!(RainfallBucket::classify(30.5), RainfallBucket::Strong);
        assert_eq!(RainfallBucket::classify(70.0), RainfallBucket::Strong);
        assert_eq!(RainfallBucket::classify(70.1), RainfallBucket::VeryStrong);
        assert_eq!(RainfallBucket::classify(2500.0), RainfallBucket::VeryStrong);
    }

    #[test]
    fn test_labels() {
        assert_eq!(RainfallBucket::None.label_ko(), "없음");
        assert_eq!(RainfallBucket::VeryStrong.label_ko(), "매우 강한 비");
        assert_eq!(
            serde_json::to_string(&RainfallBucket::VeryStrong).unwrap(),
            "\"very_strong\""
        );
    }

    #[test]
    fn test_id_matches_serialized_name() {
        for bucket in [
            RainfallBucket::None,
            RainfallBucket::Weak,
            RainfallBucket::Moderate,
            RainfallBucket::Strong,
            RainfallBucket::VeryStrong,
        ] {
            assert_eq!(serde_json::to_value(bucket).unwrap(), bucket.id());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_bucket_is_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RainfallBucket::classify(lo) <= RainfallBucket::classify(hi));
        }

        #[test]
        fn prop_negative_rainfall_matches_zero(r in -1000.0f64..0.0) {
            prop_assert_eq!(
                RainfallBucket::classify(clamp_rainfall(r)),
                RainfallBucket::classify(0.0)
            );
        }
    }
}
