
use fixtures::{availability_body, booking_page};
use meetscheduler_booking::{
    fetch_availability, group_by_day, AvailabilityError, BookingWorkflow, DisplayZone, FormError,
    Step, SubmitOutcome,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn visitor_books_a_slot_end_to_end() {
    let page = booking_page().await;
    Mock::given(method("GET"))
        .and(path("/availability/username/alice"))
        .and(query_param("days", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(availability_body(&[(
            "2025-06-02T14:00Z",
            "2025-06-02T14:30Z",
        )])))
        .expect(1)
        .mount(&page.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/book"))
        .and(body_json(json!({
            "host_id": 1,
            "start_time": "2025-06-02T14:00Z",
            "end_time": "2025-06-02T14:30Z",
            "customer_name": "Bob",
            "customer_email": "bob@x.com",
            "title": "Meeting with Bob"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meet_link": "https://meet/xyz"})))
        .expect(1)
        .mount(&page.server)
        .await;

    let scheduling = page.gateway.scheduling();
    let host = fetch_availability(scheduling, "alice", 14).await.unwrap();
    let zone = DisplayZone::Named(chrono_tz::UTC);
    let groups = group_by_day(&host.slots, &zone);
    assert_eq!(groups.len(), 1);
    assert_eq!(zone.format_day(&groups.groups()[0].day), "Monday, June 2");

    let mut workflow = BookingWorkflow::new(host.host_id);
    assert_eq!(workflow.step(), Step::Select);
    let chosen = groups.nth_slot(0).cloned().unwrap();
    assert_eq!(zone.format_time(&chosen.starts_at), "2:00 PM");
    workflow.select_slot(chosen).unwrap();
    assert_eq!(workflow.step(), Step::Form);

    workflow.set_visitor_name("Bob").unwrap();
    workflow.set_visitor_email("bob@x.com").unwrap();
    let outcome = workflow.submit(scheduling).await;

    assert_eq!(outcome, SubmitOutcome::Booked);
    assert_eq!(workflow.step(), Step::Success);
    assert_eq!(workflow.meet_link(), Some("https://meet/xyz"));
}

#[tokio::test]
async fn unknown_host_is_reported_as_not_found() {
    let page = booking_page().await;
    Mock::given(method("GET"))
        .and(path("/availability/username/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "User not found"})))
        .mount(&page.server)
        .await;

    let err = fetch_availability(page.gateway.scheduling(), "ghost", 14)
        .await
        .unwrap_err();

    assert_eq!(err, AvailabilityError::HostNotFound("ghost".into()));
    assert_eq!(err.user_message(), "User not found. Please check the booking link.");
}

#[tokio::test]
async fn invalid_email_issues_no_booking_request() {
    let page = booking_page().await;
    Mock::given(method("GET"))
        .and(path("/availability/username/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(availability_body(&[(
            "2025-06-02T14:00:00",
            "2025-06-02T14:30:00",
        )])))
        .mount(&page.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/book"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&page.server)
        .await;

    let scheduling = page.gateway.scheduling();
    let host = fetch_availability(scheduling, "alice", 14).await.unwrap();
    let mut workflow = BookingWorkflow::new(host.host_id);
    workflow.select_slot(host.slots[0].clone()).unwrap();
    workflow.set_visitor_name("Bob").unwrap();
    workflow.set_visitor_email("not-an-email").unwrap();

    let outcome = workflow.submit(scheduling).await;

    assert_eq!(outcome, SubmitOutcome::Failed(FormError::InvalidEmail));
    assert_eq!(workflow.step(), Step::Form);
    // Only the availability request went out
    assert_eq!(page.sink.names(), vec!["request_sent", "response_received"]);
}

#[tokio::test]
async fn slot_taken_meanwhile_keeps_the_form() {
    let page = booking_page().await;
    Mock::given(method("POST"))
        .and(path("/book"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"detail": "This time slot is no longer available"})),
        )
        .mount(&page.server)
        .await;

    let slot = meetscheduler_booking::AvailabilitySlot::parse(&meetscheduler_api::SlotTimes {
        start: "2025-06-02T14:00Z".into(),
        end: "2025-06-02T14:30Z".into(),
    })
    .unwrap();
    let mut workflow = BookingWorkflow::new(1);
    workflow.select_slot(slot).unwrap();
    workflow.set_visitor_name("Bob").unwrap();
    workflow.set_visitor_email("bob@x.com").unwrap();

    let outcome = workflow.submit(page.gateway.scheduling()).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(FormError::SlotUnavailable(_))));
    assert!(workflow.needs_new_slot());
    assert_eq!(workflow.step(), Step::Form);
    assert_eq!(workflow.draft().visitor_name, "Bob");
}

#[tokio::test]
async fn created_without_body_still_reaches_success() {
    let page = booking_page().await;
    Mock::given(method("POST"))
        .and(path("/book"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&page.server)
        .await;

    let slot = meetscheduler_booking::AvailabilitySlot::parse(&meetscheduler_api::SlotTimes {
        start: "2025-06-02T14:00Z".into(),
        end: "2025-06-02T14:30Z".into(),
    })
    .unwrap();
    let mut workflow = BookingWorkflow::new(1);
    workflow.select_slot(slot).unwrap();
    workflow.set_visitor_name("Bob").unwrap();
    workflow.set_visitor_email("bob@x.com").unwrap();

    let outcome = workflow.submit(page.gateway.scheduling()).await;

    assert_eq!(outcome, SubmitOutcome::Booked);
    assert_eq!(workflow.step(), Step::Success);
    assert_eq!(workflow.meet_link(), None);
    assert!(workflow.form_error().is_none());
}
