use jiff::Timestamp;

/// Time source for expiry decisions.
///
/// Every expiry comparison in the service goes through an injected
/// `Clock`, so tests can advance time without sleeping.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
