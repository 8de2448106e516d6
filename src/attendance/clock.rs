use chrono::{DateTime, Local};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a settable instant.
#[cfg(test)]
pub struct FixedClock(std::sync::Mutex<DateTime<Local>>);

#[cfg(test)]
impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(std::sync::Mutex::new(at))
    }

    pub fn set(&self, at: DateTime<Local>) {
        *self.0.lock().unwrap() = at;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }
}
