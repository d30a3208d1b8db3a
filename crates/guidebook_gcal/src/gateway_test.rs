#[cfg(test)]
mod tests {
    use crate::error::GcalError;
    use crate::gateway::EventGateway;
    use crate::models::{AccessToken, EventUpdate, NewEvent};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CALENDAR: &str = "anna@example.com";

    fn token() -> AccessToken {
        AccessToken {
            value: "ya29.test".to_string(),
            obtained_at: Utc::now(),
            expires_in: Some(3599),
        }
    }

    fn gateway(server: &MockServer) -> EventGateway {
        EventGateway::new(reqwest::Client::new(), server.uri(), "Europe/Zurich")
    }

    fn google_event(id: &str, status: &str, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "summary": format!("Event {}", id),
            "status": status,
            "htmlLink": format!("https://calendar.google.com/event?eid={}", id),
            "start": {"dateTime": start},
            "end": {"dateTime": end}
        })
    }

    async fn last_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.expect("recording enabled");
        let request = requests.last().expect("one request");
        serde_json::from_slice(&request.body).expect("json body")
    }

    #[tokio::test]
    async fn test_list_in_range_expands_orders_and_drops_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/anna@example.com/events"))
            .and(header("authorization", "Bearer ya29.test"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .and(query_param("timeMin", "2025-05-05T00:00:00Z"))
            .and(query_param("timeMax", "2025-05-06T00:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    google_event("a", "confirmed", "2025-05-05T09:00:00+02:00", "2025-05-05T10:00:00+02:00"),
                    google_event("b", "cancelled", "2025-05-05T11:00:00+02:00", "2025-05-05T12:00:00+02:00"),
                    // Cancelled recurring instances may come back without times.
                    {"id": "b2", "status": "cancelled"},
                    {
                        "id": "c",
                        "summary": "Holiday",
                        "start": {"date": "2025-05-05"},
                        "end": {"date": "2025-05-06"}
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let start = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap();
        let events = gateway(&server)
            .list_in_range(&token(), CALENDAR, start, end)
            .await
            .unwrap();

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2025, 5, 5, 7, 0, 0).unwrap());
        // All-day entries span local midnight to midnight in Zurich.
        assert_eq!(events[1].start, Utc.with_ymd_and_hms(2025, 5, 4, 22, 0, 0).unwrap());
        assert_eq!(events[1].end, Utc.with_ymd_and_hms(2025, 5, 5, 22, 0, 0).unwrap());
        assert_eq!(events[1].status, "confirmed");
    }

    #[tokio::test]
    async fn test_all_day_dates_follow_calendar_time_zone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/anna@example.com/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timeZone": "America/New_York",
                "items": [
                    {
                        "id": "calendar-zone",
                        "start": {"date": "2025-05-05"},
                        "end": {"date": "2025-05-06"}
                    },
                    {
                        "id": "own-zone",
                        "start": {"date": "2025-05-05", "timeZone": "Asia/Tokyo"},
                        "end": {"date": "2025-05-06", "timeZone": "Asia/Tokyo"}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let events = gateway(&server)
            .list_in_range(
                &token(),
                CALENDAR,
                Utc.with_ymd_and_hms(2025, 5, 4, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 7, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2025, 5, 5, 4, 0, 0).unwrap());
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2025, 5, 6, 4, 0, 0).unwrap());
        assert_eq!(events[1].start, Utc.with_ymd_and_hms(2025, 5, 4, 15, 0, 0).unwrap());
        assert_eq!(events[1].end, Utc.with_ymd_and_hms(2025, 5, 5, 15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_list_in_range_follows_page_tokens() {
        let server = MockServer::start().await;
        // Mounted first so it takes precedence for the second page request.
        Mock::given(method("GET"))
            .and(path("/calendars/anna@example.com/events"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [google_event("second", "confirmed", "2025-05-05T14:00:00Z", "2025-05-05T15:00:00Z")]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/calendars/anna@example.com/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [google_event("first", "confirmed", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let events = gateway(&server)
            .list_in_range(
                &token(),
                CALENDAR,
                Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_calendar_ids_are_percent_encoded_path_segments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/team%23tours@group.calendar.google.com/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let events = gateway(&server)
            .list_in_range(
                &token(),
                "team#tours@group.calendar.google.com",
                Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_times_in_configured_zone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/anna@example.com/events"))
            .and(header("authorization", "Bearer ya29.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(google_event(
                "evt-1",
                "confirmed",
                "2025-05-15T10:00:00+02:00",
                "2025-05-15T12:00:00+02:00",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let created = gateway(&server)
            .create(
                &token(),
                CALENDAR,
                &NewEvent {
                    summary: "Old town tour".into(),
                    description: Some("Group of 12".into()),
                    start_time: Utc.with_ymd_and_hms(2025, 5, 15, 8, 0, 0).unwrap(),
                    end_time: Utc.with_ymd_and_hms(2025, 5, 15, 10, 0, 0).unwrap(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, "evt-1");

        let body = last_body(&server).await;
        assert_eq!(body["summary"], "Old town tour");
        assert_eq!(body["start"]["dateTime"], "2025-05-15T10:00:00+02:00");
        assert_eq!(body["start"]["timeZone"], "Europe/Zurich");
        assert_eq!(body["end"]["dateTime"], "2025-05-15T12:00:00+02:00");
    }

    #[tokio::test]
    async fn test_update_sends_only_present_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/calendars/anna@example.com/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(google_event(
                "evt-1",
                "confirmed",
                "2025-05-15T11:00:00+02:00",
                "2025-05-15T12:00:00+02:00",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let update = EventUpdate {
            start_time: Some(Utc.with_ymd_and_hms(2025, 5, 15, 9, 0, 0).unwrap()),
            ..EventUpdate::default()
        };
        let updated = gateway(&server)
            .update(&token(), CALENDAR, "evt-1", &update)
            .await
            .unwrap();
        assert_eq!(updated.id, "evt-1");

        let body = last_body(&server).await;
        assert_eq!(body["start"]["dateTime"], "2025-05-15T11:00:00+02:00");
        assert_eq!(body["start"]["timeZone"], "Europe/Zurich");
        assert!(body.get("end").is_none(), "{}", body);
        assert!(body.get("summary").is_none(), "{}", body);
        assert!(body.get("description").is_none(), "{}", body);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = gateway(&server)
            .update(&token(), CALENDAR, "evt-1", &EventUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GcalError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_of_unknown_event_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/calendars/anna@example.com/events/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Not Found"}
            })))
            .mount(&server)
            .await;

        let update = EventUpdate {
            summary: Some("Renamed".into()),
            ..EventUpdate::default()
        };
        let err = gateway(&server)
            .update(&token(), CALENDAR, "missing", &update)
            .await
            .unwrap_err();
        assert!(matches!(err, GcalError::NotFound(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_delete_treats_missing_event_as_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/anna@example.com/events/gone-404"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/anna@example.com/events/gone-410"))
            .respond_with(ResponseTemplate::new(410))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/anna@example.com/events/evt-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        for event_id in ["gone-404", "gone-410", "evt-1"] {
            gateway
                .delete(&token(), CALENDAR, event_id)
                .await
                .unwrap_or_else(|e| panic!("{} should succeed: {:?}", event_id, e));
        }
    }

    #[tokio::test]
    async fn test_provider_failures_carry_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Rate Limit Exceeded"}
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .delete(&token(), CALENDAR, "evt-1")
            .await
            .unwrap_err();
        match err {
            GcalError::Provider {
                status, message, ..
            } => {
                assert_eq!(status, Some(403));
                assert_eq!(message, "Rate Limit Exceeded");
            }
            other => panic!("expected Provider, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_time_zone_falls_back_to_utc() {
        let gateway = EventGateway::new(reqwest::Client::new(), "http://localhost", "Mars/Olympus");
        assert_eq!(gateway.time_zone(), "UTC");
    }
}
