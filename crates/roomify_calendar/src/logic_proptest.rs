#[cfg(test)]
mod tests {
    use crate::logic::*;
    use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
    use proptest::prelude::*;
    use roomify_common::models::{Booking, BookingStatus, Room};

    // Any day between 2000 and roughly 2054
    fn day_from_offset(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    }

    fn booking_at(start: DateTime<Utc>, minutes: i64, user: &str) -> Booking {
        Booking {
            id: format!("b-{}", start.timestamp()),
            room_id: "r1".to_string(),
            user_id: user.to_string(),
            title: None,
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            duration_minutes: minutes,
            status: BookingStatus::Confirmed,
            created_at: None,
        }
    }

    proptest! {
        #[test]
        fn test_week_starts_on_monday(offset in 0..20_000i64, today_offset in 0..20_000i64) {
            let reference = day_from_offset(offset);
            let week = resolve_week(reference, day_from_offset(today_offset)).unwrap();
            prop_assert_eq!(week.week_start.weekday(), Weekday::Mon);
            prop_assert_eq!(week.week_end, week.week_start + Duration::days(6));
            prop_assert!(week.week_start <= reference && reference <= week.week_end);
        }

        #[test]
        fn test_week_has_seven_ascending_days(offset in 0..20_000i64) {
            let week = resolve_week(day_from_offset(offset), day_from_offset(0)).unwrap();
            prop_assert_eq!(week.days.len(), 7);
            for pair in week.days.windows(2) {
                prop_assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
            }
            prop_assert_eq!(week.days.iter().filter(|d| d.is_weekend).count(), 2);
        }

        #[test]
        fn test_navigation_round_trips(offset in 0..20_000i64) {
            let date = day_from_offset(offset);
            let next = navigate_week(date, Direction::Next).unwrap();
            prop_assert_eq!(navigate_week(next, Direction::Prev), Some(date));
            prop_assert_eq!(start_of_week(next).unwrap(), start_of_week(date).unwrap() + Duration::days(7));
        }

        #[test]
        fn test_height_is_at_least_one(start_minute in 0..600i64, minutes in 0..600i64) {
            let start = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap() + Duration::minutes(start_minute);
            let height = grid_height(start, start + Duration::minutes(minutes));
            prop_assert!(height >= 1);
            prop_assert!(height <= (minutes + 15) / 30 + 1);
        }

        #[test]
        fn test_color_is_deterministic(user in "\\PC{0,24}") {
            let color = booking_color(&user);
            prop_assert_eq!(color, booking_color(&user));
            prop_assert!(BOOKING_PALETTE.contains(&color));
        }

        #[test]
        fn test_available_slots_have_no_bookings(
            slot_index in 0..20i64,
            minutes in 1..240i64,
            show_weekends in any::<bool>(),
        ) {
            let start = Utc.with_ymd_and_hms(2024, 6, 12, 8, 0, 0).unwrap() + Duration::minutes(slot_index * 30);
            let bookings = vec![booking_at(start, minutes, "alice")];
            let rooms = vec![Room::new("r1", "Aurora", 4)];
            let options = ViewOptions { show_weekends, ..Default::default() };
            let reference = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
            let view = assemble_week(&rooms, &bookings, reference, reference, &options).unwrap();

            let mut occupied = 0;
            for day in &view.rooms[0].days {
                for slot in &day.time_slots {
                    prop_assert_eq!(slot.is_available, slot.bookings.is_empty());
                    let slot_end = slot.date_time + Duration::minutes(30);
                    let overlaps = start < slot_end && start + Duration::minutes(minutes) > slot.date_time;
                    prop_assert_eq!(!slot.is_available, overlaps);
                    if !slot.is_available {
                        occupied += 1;
                    }
                }
            }
            prop_assert!(occupied >= 1);
        }
    }
}
