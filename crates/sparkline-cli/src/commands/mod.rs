pub mod monitor;
pub mod snapshot;
pub mod stream;

use std::time::Duration;

use sparkline_core::{Chart, ChartConfig, ChartError, ChartStyle};

/// Chart-related flags as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartArgs<'a> {
    pub config_path: Option<&'a str>,
    pub capacity: Option<usize>,
    pub speed: Option<usize>,
    pub style: Option<&'a str>,
    pub interval: Option<&'a str>,
}

/// Build a validated [`ChartConfig`]: defaults, then the JSON file (if any),
/// then explicit flags.
pub fn resolve_config(args: &ChartArgs<'_>) -> Result<ChartConfig, ChartError> {
    let mut config = match args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ChartError::InvalidConfiguration(format!("{path}: {e}")))?;
            ChartConfig::from_json(&text)?
        }
        None => ChartConfig::default(),
    };

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(style) = args.style {
        config.style = style.parse::<ChartStyle>()?;
    }
    if let Some(interval) = args.interval {
        let d = parse_duration(interval).ok_or_else(|| {
            ChartError::InvalidConfiguration(format!("invalid interval '{interval}'"))
        })?;
        config.interval_ms = d.as_millis() as u64;
    }

    config.validate()?;
    Ok(config)
}

/// [`resolve_config`], exiting with a message on bad input.
pub fn load_config(args: &ChartArgs<'_>) -> ChartConfig {
    resolve_config(args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

/// Mount a chart, seeded when asked. Exits on a config the core rejects.
pub fn mount_chart(config: ChartConfig, seed: Option<u64>) -> Chart {
    let chart = match seed {
        Some(seed) => Chart::seeded(config, seed),
        None => Chart::new(config),
    };
    chart.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

/// Parse "250ms", "2s", "1m" or a bare number of milliseconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();

    let (numeric, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60_000)
    } else {
        (s, 1)
    };

    let value: u64 = numeric.trim().parse().ok()?;
    Some(Duration::from_millis(value.checked_mul(multiplier)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_duration tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("2s"), Some(Duration::from_secs(2)));
        assert_eq!(parse_duration("1m"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("40"), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration("fast"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-5ms"), None);
    }

    // -----------------------------------------------------------------------
    // resolve_config tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_resolve_defaults() {
        let config = resolve_config(&ChartArgs::default()).unwrap();
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn test_resolve_flags_override() {
        let args = ChartArgs {
            capacity: Some(48),
            speed: Some(3),
            style: Some("trendline"),
            interval: Some("100ms"),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.capacity, 48);
        assert_eq!(config.speed, 3);
        assert_eq!(config.style, ChartStyle::TrendLine);
        assert_eq!(config.interval_ms, 100);
    }

    #[test]
    fn test_resolve_rejects_zero_capacity() {
        let args = ChartArgs {
            capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(&args),
            Err(ChartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_unknown_style() {
        let args = ChartArgs {
            style: Some("radar"),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(&args),
            Err(ChartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_bad_interval() {
        let args = ChartArgs {
            interval: Some("soon"),
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());

        let args = ChartArgs {
            interval: Some("0ms"),
            ..Default::default()
        };
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_resolve_missing_config_file() {
        let args = ChartArgs {
            config_path: Some("/nonexistent/sparkline.json"),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sparkline.json"));
    }

    #[test]
    fn test_resolve_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!(
            "sparkline-config-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"capacity": 60, "speed": 5}"#).unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let args = ChartArgs {
            config_path: Some(&path_str),
            speed: Some(1),
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.capacity, 60);
        assert_eq!(config.speed, 1);
    }

    #[test]
    fn test_mount_chart_seeded_is_reproducible() {
        let a = mount_chart(ChartConfig::default(), Some(4));
        let b = mount_chart(ChartConfig::default(), Some(4));
        assert_eq!(a.window().samples(), b.window().samples());
        assert_ne!(a.id(), b.id());
    }
}
