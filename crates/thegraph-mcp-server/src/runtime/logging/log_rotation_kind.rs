use serde::Deserialize;
use tracing_appender::rolling::Rotation;

/// How often the rolling log file is rotated
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogRotationKind {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl From<LogRotationKind> for Rotation {
    fn from(value: LogRotationKind) -> Self {
        match value {
            LogRotationKind::Minutely => Rotation::MINUTELY,
            LogRotationKind::Hourly => Rotation::HOURLY,
            LogRotationKind::Daily => Rotation::DAILY,
            LogRotationKind::Never => Rotation::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogRotationKind;
    use rstest::rstest;
    use serde::Deserialize;
    use serde::de::value::{Error, StrDeserializer};
    use tracing_appender::rolling::Rotation;

    #[rstest]
    #[case("minutely", LogRotationKind::Minutely, Rotation::MINUTELY)]
    #[case("hourly", LogRotationKind::Hourly, Rotation::HOURLY)]
    #[case("daily", LogRotationKind::Daily, Rotation::DAILY)]
    #[case("never", LogRotationKind::Never, Rotation::NEVER)]
    fn deserializes_and_maps_to_appender_rotation(
        #[case] value: &str,
        #[case] expected: LogRotationKind,
        #[case] rotation: Rotation,
    ) {
        let de = StrDeserializer::<Error>::new(value);
        let actual = LogRotationKind::deserialize(de).unwrap();

        assert_eq!(actual, expected);
        assert_eq!(Rotation::from(actual), rotation);
    }

    #[test]
    fn rejects_unknown_periods() {
        let de = StrDeserializer::<Error>::new("weekly");
        let err = LogRotationKind::deserialize(de).unwrap_err();

        assert!(err.to_string().contains("unknown variant"));
    }
}
