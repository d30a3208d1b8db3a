#[cfg(test)]
mod tests {
    use crate::gateway::{active_events, GoogleEvent, GoogleEventTime};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("confirmed".to_string())),
            Just(Some("tentative".to_string())),
            Just(Some("cancelled".to_string())),
            Just(Some("CANCELLED".to_string())),
        ]
    }

    fn event_strategy() -> impl Strategy<Value = GoogleEvent> {
        (0u32..23, 1u32..60, status_strategy(), any::<bool>()).prop_map(
            |(hour, minutes, status, all_day)| {
                let time = |h: u32, m: u32| GoogleEventTime {
                    date_time: (!all_day).then(|| format!("2025-05-05T{:02}:{:02}:00Z", h, m)),
                    date: all_day.then(|| "2025-05-05".to_string()),
                    time_zone: None,
                };
                GoogleEvent {
                    id: Some(format!("evt-{}-{}", hour, minutes)),
                    summary: Some("Tour".to_string()),
                    status,
                    start: Some(time(hour, 0)),
                    end: Some(time(hour, minutes)),
                    ..GoogleEvent::default()
                }
            },
        )
    }

    proptest! {
        #[test]
        fn cancelled_events_never_survive(items in prop::collection::vec(event_strategy(), 0..20)) {
            let expected = items
                .iter()
                .filter(|item| {
                    !item
                        .status
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
                })
                .count();

            let events = active_events(items, Tz::Europe__Zurich);
            prop_assert_eq!(events.len(), expected);
            prop_assert!(events.iter().all(|e| !e.is_cancelled()));
        }
    }
}
