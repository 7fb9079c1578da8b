#[cfg(test)]
mod tests {
    use crate::logic::*;
    use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
    use roomify_common::models::{Booking, BookingStatus, Room};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn booking(id: &str, room: &str, user: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: id.to_string(),
            room_id: room.to_string(),
            user_id: user.to_string(),
            title: Some("Sync".to_string()),
            start_time: start,
            end_time: end,
            duration_minutes: (end - start).num_minutes(),
            status: BookingStatus::Confirmed,
            created_at: None,
        }
    }

    fn slot_at(view: &CalendarWeekView, room: usize, day: usize, hour: u32, minute: u32) -> &CalendarTimeSlot {
        view.rooms[room].days[day]
            .time_slots
            .iter()
            .find(|s| s.slot.hour == hour && s.slot.minute == minute)
            .unwrap()
    }

    #[test]
    fn test_generate_time_slots() {
        let slots = generate_time_slots();
        assert_eq!(slots.len(), 20);
        assert_eq!((slots[0].hour, slots[0].minute), (8, 0));
        assert_eq!((slots[19].hour, slots[19].minute), (17, 30));
        assert_eq!(slots[0].label, "8:00 AM");
        assert_eq!(slots[9].label, "12:30 PM");
        for pair in slots.windows(2) {
            let gap = pair[1].start_time() - pair[0].start_time();
            assert_eq!(gap, Duration::minutes(30));
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(9, 0), "9:00 AM");
        assert_eq!(format_time(12, 0), "12:00 PM");
        assert_eq!(format_time(14, 30), "2:30 PM");
        assert_eq!(format_time(0, 0), "12:00 AM");
    }

    #[test]
    fn test_start_of_week() {
        // 2024-06-10 is a Monday
        assert_eq!(start_of_week(date(2024, 6, 10)), Some(date(2024, 6, 10)));
        assert_eq!(start_of_week(date(2024, 6, 13)), Some(date(2024, 6, 10)));
        assert_eq!(start_of_week(date(2024, 6, 15)), Some(date(2024, 6, 10)));
        assert_eq!(start_of_week(date(2024, 6, 16)), Some(date(2024, 6, 10)));
        assert_eq!(start_of_week(date(2024, 6, 17)), Some(date(2024, 6, 17)));
    }

    #[test]
    fn test_resolve_week() {
        let week = resolve_week(date(2024, 6, 12), date(2024, 6, 14)).unwrap();
        assert_eq!(week.week_start, date(2024, 6, 10));
        assert_eq!(week.week_end, date(2024, 6, 16));
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].day_name, "Mon");
        assert_eq!(week.days[0].day_number, 10);
        let today: Vec<_> = week.days.iter().filter(|d| d.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date.weekday(), Weekday::Fri);
        let weekend: Vec<_> = week.days.iter().filter(|d| d.is_weekend).map(|d| d.day_name.as_str()).collect();
        assert_eq!(weekend, vec!["Sat", "Sun"]);
    }

    #[test]
    fn test_resolve_week_today_elsewhere() {
        let week = resolve_week(date(2024, 6, 12), date(2025, 1, 1)).unwrap();
        assert!(week.days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn test_navigate_week() {
        assert_eq!(navigate_week(date(2024, 6, 12), Direction::Next), Some(date(2024, 6, 19)));
        assert_eq!(navigate_week(date(2024, 6, 12), Direction::Prev), Some(date(2024, 6, 5)));
        assert_eq!("next".parse::<Direction>().unwrap(), Direction::Next);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_weeks_at_edge_of_date_range() {
        assert_eq!(navigate_week(NaiveDate::MAX, Direction::Next), None);
        assert_eq!(navigate_week(NaiveDate::MIN, Direction::Prev), None);
        assert!(navigate_week(NaiveDate::MAX, Direction::Prev).is_some());
        // both bounds fall on a Tuesday
        assert_eq!(start_of_week(NaiveDate::MIN), None);
        assert!(resolve_week(NaiveDate::MAX, NaiveDate::MAX).is_none());
        let rooms = vec![Room::new("r1", "Aurora", 4)];
        assert!(assemble_week(&rooms, &[], NaiveDate::MAX, NaiveDate::MAX, &ViewOptions::default()).is_none());

        assert!(is_supported_date(date(1, 1, 1)));
        assert!(is_supported_date(date(9999, 12, 31)));
        assert!(!is_supported_date(date(10000, 1, 1)));
        assert!(!is_supported_date(NaiveDate::MIN));
    }

    #[test]
    fn test_format_week_range() {
        assert_eq!(format_week_range(date(2024, 12, 2), date(2024, 12, 8)), "Dec 2 - 8, 2024");
        assert_eq!(
            format_week_range(date(2024, 11, 25), date(2024, 12, 1)),
            "Nov 25 - Dec 1, 2024"
        );
        assert_eq!(
            format_week_range(date(2024, 12, 30), date(2025, 1, 5)),
            "Dec 30 - Jan 5, 2025"
        );
    }

    #[test]
    fn test_booking_in_slot_is_half_open() {
        let tz = chrono_tz::UTC;
        let day = date(2024, 6, 10);
        let start = utc(2024, 6, 10, 9, 0);
        let end = utc(2024, 6, 10, 9, 30);
        assert!(is_booking_in_slot(start, end, day, &TimeSlot::new(9, 0), &tz));
        assert!(!is_booking_in_slot(start, end, day, &TimeSlot::new(9, 30), &tz));
        assert!(!is_booking_in_slot(start, end, day, &TimeSlot::new(8, 30), &tz));
        // other day
        assert!(!is_booking_in_slot(start, end, date(2024, 6, 11), &TimeSlot::new(9, 0), &tz));
    }

    #[test]
    fn test_grid_height() {
        assert_eq!(grid_height(utc(2024, 6, 10, 10, 0), utc(2024, 6, 10, 11, 30)), 3);
        assert_eq!(grid_height(utc(2024, 6, 10, 10, 0), utc(2024, 6, 10, 10, 15)), 1);
        assert_eq!(grid_height(utc(2024, 6, 10, 10, 0), utc(2024, 6, 10, 10, 45)), 2);
        assert_eq!(grid_height(utc(2024, 6, 10, 10, 0), utc(2024, 6, 10, 10, 0)), 1);
    }

    #[test]
    fn test_booking_duration_rounds_to_minutes() {
        let start = utc(2024, 6, 10, 10, 0);
        assert_eq!(booking_duration_minutes(start, start + Duration::seconds(90)), 2);
        assert_eq!(booking_duration_minutes(start, start + Duration::seconds(89)), 1);
        assert_eq!(booking_duration_minutes(start, start + Duration::hours(2)), 120);
    }

    #[test]
    fn test_grid_position() {
        let slots = generate_time_slots();
        let tz = chrono_tz::UTC;
        assert_eq!(grid_position(utc(2024, 6, 10, 8, 0), &slots, &tz), Some(0));
        assert_eq!(grid_position(utc(2024, 6, 10, 9, 30), &slots, &tz), Some(3));
        // unaligned start floors to the containing slot
        assert_eq!(grid_position(utc(2024, 6, 10, 9, 15), &slots, &tz), Some(2));
        assert_eq!(grid_position(utc(2024, 6, 10, 17, 59), &slots, &tz), Some(19));
        assert_eq!(grid_position(utc(2024, 6, 10, 7, 30), &slots, &tz), None);
        assert_eq!(grid_position(utc(2024, 6, 10, 18, 0), &slots, &tz), None);
    }

    #[test]
    fn test_booking_color() {
        assert_eq!(booking_color("alice"), booking_color("alice"));
        assert_eq!(booking_color("alice"), "#3B82F6");
        assert_eq!(booking_color("bob"), "#F97316");
        assert_eq!(booking_color(""), BOOKING_PALETTE[0]);
        assert!(BOOKING_PALETTE.contains(&booking_color("3f1c2a9e-7d5b-4c1e-9a8f-0b6d2e4c8a71")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(90), "1h 30m");
    }

    #[test]
    fn test_assemble_week_scenario() {
        let rooms = vec![Room::new("room-a", "Room A", 6)];
        let bookings = vec![booking(
            "b1",
            "room-a",
            "alice",
            utc(2024, 6, 10, 9, 0),
            utc(2024, 6, 10, 10, 0),
        )];
        let options = ViewOptions::default();
        let view = assemble_week(&rooms, &bookings, date(2024, 6, 10), date(2024, 6, 10), &options)
            .expect("week for non-empty rooms");

        assert_eq!(view.week_start, date(2024, 6, 10));
        assert_eq!(view.label, "Jun 10 - 16, 2024");
        assert_eq!(view.rooms.len(), 1);
        // weekends hidden by default
        assert_eq!(view.rooms[0].days.len(), 5);
        assert!(view.rooms[0].days[0].day.is_today);
        assert_eq!(view.rooms[0].days[0].time_slots.len(), 20);

        let nine = slot_at(&view, 0, 0, 9, 0);
        assert!(!nine.is_available);
        assert_eq!(nine.bookings.len(), 1);
        assert_eq!(nine.bookings[0].grid_height, 2);
        assert_eq!(nine.bookings[0].grid_position, Some(2));
        assert_eq!(nine.bookings[0].color, booking_color("alice"));
        assert_eq!(nine.date_time, utc(2024, 6, 10, 9, 0));

        assert!(!slot_at(&view, 0, 0, 9, 30).is_available);
        assert!(slot_at(&view, 0, 0, 10, 0).is_available);
        assert!(slot_at(&view, 0, 1, 9, 0).is_available);
    }

    #[test]
    fn test_assemble_week_empty_rooms_is_none() {
        let options = ViewOptions::default();
        assert!(assemble_week(&[], &[], date(2024, 6, 10), date(2024, 6, 10), &options).is_none());
    }

    #[test]
    fn test_assemble_week_with_weekends() {
        let rooms = vec![Room::new("room-a", "Room A", 6)];
        let options = ViewOptions {
            show_weekends: true,
            ..Default::default()
        };
        let view = assemble_week(&rooms, &[], date(2024, 6, 16), date(2024, 6, 1), &options).unwrap();
        let days = &view.rooms[0].days;
        assert_eq!(days.len(), 7);
        assert_eq!(days.iter().filter(|d| d.day.is_weekend).count(), 2);
        assert!(days.iter().flat_map(|d| &d.time_slots).all(|s| s.is_available));
    }

    #[test]
    fn test_assemble_week_ignores_other_rooms_and_unconfirmed() {
        let rooms = vec![Room::new("room-a", "Room A", 6), Room::new("room-b", "Room B", 4)];
        let mut cancelled = booking("b2", "room-a", "bob", utc(2024, 6, 11, 14, 0), utc(2024, 6, 11, 15, 0));
        cancelled.status = BookingStatus::Cancelled;
        let bookings = vec![
            booking("b1", "room-b", "alice", utc(2024, 6, 11, 14, 0), utc(2024, 6, 11, 15, 0)),
            cancelled,
        ];
        let view = assemble_week(&rooms, &bookings, date(2024, 6, 11), date(2024, 6, 11), &ViewOptions::default())
            .unwrap();
        assert!(slot_at(&view, 0, 1, 14, 0).is_available);
        let b = slot_at(&view, 1, 1, 14, 0);
        assert_eq!(b.bookings.len(), 1);
        assert_eq!(b.bookings[0].booking.id, "b1");
    }

    #[test]
    fn test_rounded_height_differs_from_marked_slots() {
        // 40 minutes touches two slots but rounds to a height of one
        let rooms = vec![Room::new("room-a", "Room A", 6)];
        let bookings = vec![booking(
            "b1",
            "room-a",
            "alice",
            utc(2024, 6, 10, 9, 0),
            utc(2024, 6, 10, 9, 40),
        )];
        let view = assemble_week(&rooms, &bookings, date(2024, 6, 10), date(2024, 6, 10), &ViewOptions::default())
            .unwrap();
        let occupied = view.rooms[0].days[0]
            .time_slots
            .iter()
            .filter(|s| !s.is_available)
            .count();
        assert_eq!(occupied, 2);
        assert_eq!(slot_at(&view, 0, 0, 9, 0).bookings[0].grid_height, 1);
    }
}
