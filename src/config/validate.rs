// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, MonitorConfig, RawConfigFile};
use crate::errors::{MonitorError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MonitorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let monitor = validate_monitor(&raw)?;
        validate_query(&raw)?;
        validate_source(&raw)?;
        Ok(ConfigFile::new_unchecked(monitor, raw.query, raw.source))
    }
}

fn validate_monitor(cfg: &RawConfigFile) -> Result<MonitorConfig> {
    let poll_interval = parse_duration(&cfg.monitor.poll_interval).map_err(|e| {
        MonitorError::ConfigError(format!("[monitor].poll_interval: {e}"))
    })?;
    if poll_interval.is_zero() {
        return Err(MonitorError::ConfigError(
            "[monitor].poll_interval must be greater than zero".to_string(),
        ));
    }

    if cfg.monitor.window_lines == 0 {
        return Err(MonitorError::ConfigError(
            "[monitor].window_lines must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(MonitorConfig {
        poll_interval,
        window_lines: cfg.monitor.window_lines,
        title: cfg.monitor.title.clone(),
    })
}

fn validate_query(cfg: &RawConfigFile) -> Result<()> {
    if cfg.query.process_label.trim().is_empty() {
        return Err(MonitorError::ConfigError(
            "[query].process_label must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_source(cfg: &RawConfigFile) -> Result<()> {
    if cfg.source.registry.as_os_str().is_empty() {
        return Err(MonitorError::ConfigError(
            "[source].registry must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Parse `"<number><unit>"` with unit `ms`, `s`, `m` or `h`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };
    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration(" 2s "), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("3m"), Ok(Duration::from_secs(180)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn oversized_durations_are_rejected_not_wrapped() {
        let err = parse_duration("18446744073709551615h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("307445734561825861m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn defaults_validate() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.monitor.poll_interval, Duration::from_secs(2));
        assert_eq!(cfg.monitor.window_lines, 3);
        assert_eq!(cfg.query.process_label, "PwBandsWorkChain");
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.monitor.window_lines = 0;
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, MonitorError::ConfigError(msg) if msg.contains("window_lines")));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.monitor.poll_interval = "0s".to_string();
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn blank_process_label_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.query.process_label = "  ".to_string();
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
