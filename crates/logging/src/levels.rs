//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// One line per completed status request.
    Stat,
    /// End-of-run totals.
    Summary,
}

impl InfoFlag {
    /// Every info flag.
    pub const ALL: [Self; 2] = [Self::Stat, Self::Summary];

    /// Token name used by `--info`-style flag strings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Summary => "summary",
        }
    }

    /// Tracing target events for this flag are emitted on.
    pub const fn target(self) -> &'static str {
        match self {
            Self::Stat => "oc_stat::stat",
            Self::Summary => "oc_stat::summary",
        }
    }

    /// Looks up a flag by token name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }

    /// Looks up a flag by tracing target.
    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.target() == target)
    }
}

/// Debug flags for internal diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Completion handlers on the event-loop thread.
    Complete,
    /// Job allocation, state transitions, and release.
    Job,
    /// Worker pool startup, shutdown, and panics.
    Pool,
    /// Blocking syscalls on worker threads.
    Worker,
}

impl DebugFlag {
    /// Every debug flag.
    pub const ALL: [Self; 4] = [Self::Complete, Self::Job, Self::Pool, Self::Worker];

    /// Token name used by `--debug`-style flag strings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Job => "job",
            Self::Pool => "pool",
            Self::Worker => "worker",
        }
    }

    /// Tracing target events for this flag are emitted on.
    pub const fn target(self) -> &'static str {
        match self {
            Self::Complete => "oc_stat::complete",
            Self::Job => "oc_stat::job",
            Self::Pool => "oc_stat::pool",
            Self::Worker => "oc_stat::worker",
        }
    }

    /// Looks up a flag by token name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }

    /// Looks up a flag by tracing target.
    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.target() == target)
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Per-request output level.
    pub stat: u8,
    /// Summary output level.
    pub summary: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Stat => self.stat,
            InfoFlag::Summary => self.summary,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Stat => self.stat = level,
            InfoFlag::Summary => self.summary = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Completion handler level.
    pub complete: u8,
    /// Job lifecycle level.
    pub job: u8,
    /// Worker pool level.
    pub pool: u8,
    /// Worker syscall level.
    pub worker: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Complete => self.complete,
            DebugFlag::Job => self.job,
            DebugFlag::Pool => self.pool,
            DebugFlag::Worker => self.worker,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Complete => self.complete = level,
            DebugFlag::Job => self.job = level,
            DebugFlag::Pool => self.pool = level,
            DebugFlag::Worker => self.worker = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_names_round_trip() {
        for flag in InfoFlag::ALL {
            assert_eq!(InfoFlag::from_name(flag.name()), Some(flag));
            assert_eq!(InfoFlag::from_target(flag.target()), Some(flag));
        }
        assert_eq!(InfoFlag::from_name("copy"), None);
    }

    #[test]
    fn debug_targets_are_exact() {
        assert_eq!(DebugFlag::from_target("oc_stat::job"), Some(DebugFlag::Job));
        assert_eq!(DebugFlag::from_target("oc_stat::jobs"), None);
        assert_eq!(DebugFlag::from_target("job"), None);
    }

    #[test]
    fn set_all_touches_every_flag() {
        let mut levels = DebugLevels::default();
        levels.set_all(3);
        for flag in DebugFlag::ALL {
            assert_eq!(levels.get(flag), 3);
        }

        let mut info = InfoLevels::default();
        info.set(InfoFlag::Summary, 2);
        assert_eq!(info.get(InfoFlag::Summary), 2);
        assert_eq!(info.get(InfoFlag::Stat), 0);
    }
}
