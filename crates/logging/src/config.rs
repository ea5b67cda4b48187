//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
///
/// Levels follow the tracing level of the events they admit: `1` lets
/// `info` events through, `2` adds `debug`, and `3` adds `trace`.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from a `-v` count.
    ///
    /// - `0`: warnings and errors only
    /// - `1`: per-request lines and the summary
    /// - `2`: adds job lifecycle and completion handler debugging
    /// - `3`: adds worker and pool debugging
    /// - `4` and above: everything, including trace events
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config.info.set_all(1);
        }
        if level >= 2 {
            config.debug.job = 2;
            config.debug.complete = 2;
        }
        if level >= 3 {
            config.debug.worker = 2;
            config.debug.pool = 2;
        }
        if level >= 4 {
            config.info.set_all(3);
            config.debug.set_all(3);
        }

        config
    }

    /// Apply a single info flag token (e.g., "stat2", "summary").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "all" => self.info.set_all(level),
            "none" => self.info.set_all(0),
            _ => {
                let flag = InfoFlag::from_name(name)
                    .ok_or_else(|| format!("unknown info flag: {name}"))?;
                self.info.set(flag, level);
            }
        }
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "job2", "worker").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "all" => self.debug.set_all(level),
            "none" => self.debug.set_all(0),
            _ => {
                let flag = DebugFlag::from_name(name)
                    .ok_or_else(|| format!("unknown debug flag: {name}"))?;
                self.debug.set(flag, level);
            }
        }
        Ok(())
    }

    /// Renders `EnvFilter` directives equivalent to this configuration.
    ///
    /// Everything defaults to `warn`; each non-zero flag raises its own
    /// target.
    pub fn filter_directives(&self) -> String {
        let mut directives = vec!["warn".to_owned()];
        let info = InfoFlag::ALL
            .into_iter()
            .map(|flag| (flag.target(), self.info.get(flag)));
        let debug = DebugFlag::ALL
            .into_iter()
            .map(|flag| (flag.target(), self.debug.get(flag)));
        for (target, level) in info.chain(debug) {
            if let Some(name) = level_name(level) {
                directives.push(format!("{target}={name}"));
            }
        }
        directives.join(",")
    }
}

const fn level_name(level: u8) -> Option<&'static str> {
    match level {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Parse a flag token like "job2" into ("job", 2) or "stat" into ("stat", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_quiet() {
        let config = VerbosityConfig::from_verbose_level(0);
        assert_eq!(config, VerbosityConfig::default());
        assert_eq!(config.filter_directives(), "warn");
    }

    #[test]
    fn level_two_enables_job_and_complete() {
        let config = VerbosityConfig::from_verbose_level(2);
        assert_eq!(config.info.stat, 1);
        assert_eq!(config.debug.job, 2);
        assert_eq!(config.debug.complete, 2);
        assert_eq!(config.debug.worker, 0);
    }

    #[test]
    fn parse_flag_token_defaults_to_one() {
        assert_eq!(parse_flag_token("job"), Ok(("job", 1)));
        assert_eq!(parse_flag_token("worker3"), Ok(("worker", 3)));
        assert!(parse_flag_token("").is_err());
        assert!(parse_flag_token("2").is_err());
        assert!(parse_flag_token("job999").is_err());
    }

    #[test]
    fn apply_all_and_none() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_flag("all2").unwrap();
        assert_eq!(config.debug.pool, 2);
        config.apply_debug_flag("none").unwrap();
        assert_eq!(config.debug, DebugLevels::default());
    }

    #[test]
    fn directives_name_each_enabled_target() {
        let mut config = VerbosityConfig::default();
        config.apply_info_flag("stat").unwrap();
        config.apply_debug_flag("worker3").unwrap();
        assert_eq!(
            config.filter_directives(),
            "warn,oc_stat::stat=info,oc_stat::worker=trace"
        );
    }
}
