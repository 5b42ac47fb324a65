use chrono::Local;

/// Source of the timestamp given to incidents created without a time.
pub trait Clock {
    fn now(&self) -> String;
}

/// Local wall-clock time formatted like a browser's `toLocaleString`,
/// e.g. `10/19/2026, 5:33:00 PM`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> String {
        Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
    }
}

#[derive(Clone, Debug, Default)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(now: impl Into<String>) -> Self {
        Self(now.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_clock_uses_locale_shape() {
        let now = LocalClock.now();
        assert!(now.contains(", "), "{now}");
        assert!(now.ends_with("AM") || now.ends_with("PM"), "{now}");
        assert_eq!(now.matches('/').count(), 2, "{now}");
    }
}
