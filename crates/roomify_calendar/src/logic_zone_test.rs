#[cfg(test)]
mod tests {
    use crate::logic::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Europe::Zurich;
    use roomify_common::models::{Booking, BookingStatus, Room};

    fn zurich_options() -> ViewOptions {
        ViewOptions {
            show_weekends: true,
            time_zone: Zurich,
        }
    }

    #[test]
    fn test_slots_are_local_wall_clock() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        // CEST: 09:00 local is 07:00 UTC
        let instant = slot_date_time(day, &TimeSlot::new(9, 0), &Zurich);
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 6, 10, 7, 0, 0).unwrap());

        let winter = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        let instant = slot_date_time(winter, &TimeSlot::new(9, 0), &Zurich);
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 12, 2, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_position_uses_local_time() {
        let slots = generate_time_slots();
        let start = Utc.with_ymd_and_hms(2024, 6, 10, 7, 30, 0).unwrap();
        assert_eq!(grid_position(start, &slots, &Zurich), Some(3));
        assert_eq!(grid_position(start, &slots, &chrono_tz::UTC), None);
    }

    #[test]
    fn test_booking_near_midnight_stays_on_its_local_day() {
        // 23:30 UTC on Sunday is 01:30 Monday in Zurich, outside business hours
        let rooms = vec![Room::new("r1", "Aurora", 4)];
        let start = Utc.with_ymd_and_hms(2024, 6, 9, 23, 30, 0).unwrap();
        let bookings = vec![Booking {
            id: "late".to_string(),
            room_id: "r1".to_string(),
            user_id: "night-owl".to_string(),
            title: None,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            duration_minutes: 60,
            status: BookingStatus::Confirmed,
            created_at: None,
        }];
        let reference = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let view = assemble_week(&rooms, &bookings, reference, reference, &zurich_options()).unwrap();
        let occupied = view.rooms[0]
            .days
            .iter()
            .flat_map(|d| &d.time_slots)
            .filter(|s| !s.is_available)
            .count();
        assert_eq!(occupied, 0);
    }

    #[test]
    fn test_week_across_spring_forward() {
        // clocks jump on Sunday 2024-03-31; slots keep their wall-clock labels
        let rooms = vec![Room::new("r1", "Aurora", 4)];
        let reference = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let view = assemble_week(&rooms, &[], reference, reference, &zurich_options()).unwrap();
        let days = &view.rooms[0].days;
        assert_eq!(days.len(), 7);
        let saturday = &days[5].time_slots[0];
        let sunday = &days[6].time_slots[0];
        assert_eq!(saturday.date_time, Utc.with_ymd_and_hms(2024, 3, 30, 7, 0, 0).unwrap());
        assert_eq!(sunday.date_time, Utc.with_ymd_and_hms(2024, 3, 31, 6, 0, 0).unwrap());
    }
}
