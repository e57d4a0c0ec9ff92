use chrono::Utc;

/// Clock abstraction so that usecases and the dispatcher can be tested with
/// a frozen or stepped time source.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis.
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall-clock implementation used outside of tests.
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
