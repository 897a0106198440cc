//! Mock scheduling backend for unit tests.

use async_trait::async_trait;
use meetscheduler_api::{
    ApiError, BookingRequest, BookingResult, HostAvailability, SchedulingService, SlotTimes,
};
use mockall::mock;

mock! {
    pub Scheduling {}

    #[async_trait]
    impl SchedulingService for Scheduling {
        async fn availability_by_username(
            &self,
            username: &str,
            days: u32,
        ) -> Result<HostAvailability, ApiError>;

        async fn book(&self, request: BookingRequest) -> Result<BookingResult, ApiError>;
    }
}

pub fn slot_times(start: &str, end: &str) -> SlotTimes {
    SlotTimes {
        start: start.to_string(),
        end: end.to_string(),
    }
}

pub fn api_status(status: u16, body: serde_json::Value) -> ApiError {
    ApiError::Status { status, body }
}
