// End-to-end checks of the week grid through the public service API.

use chrono::{NaiveDate, TimeZone, Utc};
use roomify_calendar::service::{CreateBookingRequest, QuickBookingRequest};
use roomify_calendar::{CalendarService, Direction, LiveCalendar};
use roomify_calendar::view_state::CalendarViewState;
use roomify_common::models::Room;
use roomify_store::MemoryStore;
use std::sync::Arc;

fn zurich_service() -> CalendarService {
    let store = Arc::new(MemoryStore::with_rooms(vec![
        Room::new("r2", "Borealis", 4),
        Room::new("r1", "Aurora", 8),
    ]));
    CalendarService::new(store, chrono_tz::Europe::Zurich)
}

#[tokio::test]
async fn test_local_business_hours_in_summer() {
    let service = zurich_service();
    // 09:00-10:30 in Zurich during CEST
    let start = Utc.with_ymd_and_hms(2024, 6, 11, 7, 0, 0).unwrap();
    service
        .create_booking(CreateBookingRequest {
            room_id: "r1".to_string(),
            user_id: "bob".to_string(),
            title: Some("Retro".to_string()),
            start_time: start,
            end_time: start + chrono::Duration::minutes(90),
        })
        .await
        .unwrap();

    let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let week = service
        .fetch_week(NaiveDate::from_ymd_opt(2024, 6, 13).unwrap(), monday, false, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(week.label, "Jun 10 - 14, 2024");
    assert_eq!(week.rooms.len(), 2);
    assert_eq!(week.rooms[0].room.name, "Aurora");

    let tuesday = &week.rooms[0].days[1];
    assert!(!tuesday.day.is_today);
    let busy: Vec<&str> = tuesday
        .time_slots
        .iter()
        .filter(|slot| !slot.is_available)
        .map(|slot| slot.slot.label.as_str())
        .collect();
    assert_eq!(busy, vec!["9:00 AM", "9:30 AM", "10:00 AM"]);

    let placed = &tuesday.time_slots[2].bookings[0];
    assert_eq!(placed.grid_position, Some(2));
    assert_eq!(placed.grid_height, 3);
    assert_eq!(placed.color, "#F97316");

    assert!(week.rooms[1].days.iter().all(|day| day.time_slots.iter().all(|s| s.is_available)));
}

#[tokio::test]
async fn test_quick_booking_shows_up_in_live_view() {
    let service = Arc::new(zurich_service());
    let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 6, 52, 10).unwrap();

    let booking = service
        .quick_booking(
            QuickBookingRequest {
                room_id: "r2".to_string(),
                user_id: "alice".to_string(),
                duration_minutes: 30,
                title: None,
            },
            now,
        )
        .await
        .unwrap();
    assert_eq!(booking.start_time, Utc.with_ymd_and_hms(2024, 6, 10, 7, 0, 0).unwrap());
    assert_eq!(booking.title.as_deref(), Some("Quick Booking"));

    let live = LiveCalendar::with_today(service, CalendarViewState::new(monday), move || monday);
    assert!(live.toggle_room("r2").await.unwrap());
    let week = live.snapshot().week.unwrap();
    assert_eq!(week.rooms.len(), 1);
    assert!(!week.rooms[0].days[0].time_slots[2].is_available);

    assert!(live.navigate(Direction::Next).await.unwrap());
    let week = live.snapshot().week.unwrap();
    assert_eq!(week.week_start, NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
    assert!(week.rooms[0].days[0].time_slots.iter().all(|s| s.is_available));
}
