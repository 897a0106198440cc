#[cfg(test)]
mod tests {
    use crate::availability::fetch_availability;
    use crate::error::AvailabilityError;
    use crate::mock::{api_status, slot_times, MockScheduling};
    use meetscheduler_api::{ApiError, HostAvailability};
    use serde_json::json;

    fn host(slots: Vec<meetscheduler_api::SlotTimes>) -> HostAvailability {
        HostAvailability {
            host_id: 1,
            host_email: "alice@example.com".to_string(),
            available_slots: slots,
        }
    }

    #[tokio::test]
    async fn test_slots_keep_backend_order() {
        let mut backend = MockScheduling::new();
        backend
            .expect_availability_by_username()
            .withf(|username: &str, days: &u32| username == "alice" && *days == 14)
            .times(1)
            .returning(|_, _| {
                Ok(host(vec![
                    slot_times("2025-06-02T14:00Z", "2025-06-02T14:30Z"),
                    slot_times("2025-06-02T09:00:00", "2025-06-02T09:30:00"),
                ]))
            });

        let loaded = fetch_availability(&backend, "  alice ", 14).await.unwrap();

        assert_eq!(loaded.host_id, 1);
        assert_eq!(loaded.host_email, "alice@example.com");
        let starts: Vec<&str> = loaded.slots.iter().map(|s| s.start.as_str()).collect();
        assert_eq!(starts, vec!["2025-06-02T14:00Z", "2025-06-02T09:00:00"]);
    }

    #[tokio::test]
    async fn test_unknown_host_is_distinguished() {
        let mut backend = MockScheduling::new();
        backend
            .expect_availability_by_username()
            .returning(|_, _| Err(api_status(404, json!({"detail": "User not found"}))));

        let err = fetch_availability(&backend, "ghost", 14).await.unwrap_err();

        assert_eq!(err, AvailabilityError::HostNotFound("ghost".to_string()));
        assert_eq!(err.user_message(), "User not found. Please check the booking link.");
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_backend() {
        let mut backend = MockScheduling::new();
        backend.expect_availability_by_username().times(0);

        assert!(matches!(
            fetch_availability(&backend, "   ", 14).await,
            Err(AvailabilityError::InvalidInput(_))
        ));
        assert!(matches!(
            fetch_availability(&backend, "alice", 0).await,
            Err(AvailabilityError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_backend_failure_is_generic() {
        let mut backend = MockScheduling::new();
        backend.expect_availability_by_username().returning(|_, _| {
            Err(api_status(
                400,
                json!({"detail": "Host has not connected their Google Calendar"}),
            ))
        });

        let err = fetch_availability(&backend, "alice", 14).await.unwrap_err();

        assert_eq!(
            err,
            AvailabilityError::Backend {
                status: 400,
                message: "Host has not connected their Google Calendar".to_string()
            }
        );
        assert_eq!(err.user_message(), "Failed to load available slots");
    }

    #[tokio::test]
    async fn test_network_failure() {
        let mut backend = MockScheduling::new();
        backend
            .expect_availability_by_username()
            .returning(|_, _| Err(ApiError::Network("connection refused".into())));

        let err = fetch_availability(&backend, "alice", 14).await.unwrap_err();

        assert_eq!(err, AvailabilityError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn test_unparseable_slot_is_malformed() {
        let mut backend = MockScheduling::new();
        backend.expect_availability_by_username().returning(|_, _| {
            Ok(host(vec![
                slot_times("2025-06-02T14:00Z", "2025-06-02T14:30Z"),
                slot_times("tomorrow", "later"),
            ]))
        });

        let err = fetch_availability(&backend, "alice", 14).await.unwrap_err();

        assert!(matches!(err, AvailabilityError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_availability() {
        let mut backend = MockScheduling::new();
        backend
            .expect_availability_by_username()
            .returning(|_, _| Ok(host(Vec::new())));

        let loaded = fetch_availability(&backend, "alice", 7).await.unwrap();

        assert!(loaded.slots.is_empty());
    }
}
