#[cfg(test)]
mod tests {
    use crate::error::GcalError;
    use crate::resolver::{CalendarPurpose, CalendarResolver};
    use crate::test_support::MockStore;
    use guidebook_db::ConnectedGuide;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_booking_calendar_is_the_guide_email() {
        let mut store = MockStore::new();
        store
            .expect_get_guide_email()
            .withf(|id| id == "g1")
            .returning(|_| Ok(Some("anna@example.com".to_string())));

        let resolver = CalendarResolver::new(Arc::new(store));
        let calendar = resolver
            .resolve("g1", CalendarPurpose::Booking)
            .await
            .unwrap();
        assert_eq!(calendar, "anna@example.com");
    }

    #[tokio::test]
    async fn test_availability_calendar_uses_dedicated_id() {
        let mut store = MockStore::new();
        store
            .expect_get_availability_calendar_id()
            .returning(|_| Ok(Some(" anna-slots@group.calendar.google.com ".to_string())));
        store.expect_get_guide_email().never();

        let resolver = CalendarResolver::new(Arc::new(store));
        let calendar = resolver
            .resolve("g1", CalendarPurpose::Availability)
            .await
            .unwrap();
        assert_eq!(calendar, "anna-slots@group.calendar.google.com");
    }

    #[tokio::test]
    async fn test_missing_or_blank_identifier_is_not_found() {
        let mut store = MockStore::new();
        store.expect_get_guide_email().returning(|_| Ok(None));
        store
            .expect_get_availability_calendar_id()
            .returning(|_| Ok(Some(String::new())));

        let resolver = CalendarResolver::new(Arc::new(store));
        for purpose in [CalendarPurpose::Booking, CalendarPurpose::Availability] {
            let err = resolver.resolve("g1", purpose).await.unwrap_err();
            assert!(matches!(err, GcalError::NotFound(_)), "{:?}", err);
        }
    }

    #[test]
    fn test_resolve_connected_guide() {
        let mut guide = ConnectedGuide {
            id: "g2".into(),
            name: "Bert".into(),
            refresh_token: "1//bert".into(),
            availability_calendar_id: None,
        };
        assert!(matches!(
            CalendarResolver::resolve_connected(&guide),
            Err(GcalError::NotFound(_))
        ));
        guide.availability_calendar_id = Some("bert-slots@group".into());
        assert_eq!(
            CalendarResolver::resolve_connected(&guide).unwrap(),
            "bert-slots@group"
        );
    }
}
