// --- File: crates/roomify_calendar/src/logic.rs ---
//! Week × room × slot grid computation.
//!
//! Everything here is pure: callers pass in the rooms, the bookings, the
//! reference date and "today", and get the assembled week back. Wall-clock
//! times are interpreted in [`ViewOptions::time_zone`].

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use roomify_common::models::{Booking, Room};
use roomify_common::services::local_to_utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// First bookable hour of the day.
pub const BUSINESS_START_HOUR: u32 = 8;
/// Business hours end at this hour (exclusive).
pub const BUSINESS_END_HOUR: u32 = 18;
pub const SLOT_MINUTES: u32 = 30;

/// Years accepted from callers. Zone conversions of any day in these years
/// stay inside chrono's date range.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Colors handed out to users, indexed by [`booking_color`].
pub const BOOKING_PALETTE: [&str; 8] = [
    "#3B82F6", // blue
    "#10B981", // emerald
    "#F59E0B", // amber
    "#EF4444", // red
    "#8B5CF6", // violet
    "#F97316", // orange
    "#06B6D4", // cyan
    "#84CC16", // lime
];

// --- Data Structures ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TimeSlot {
    #[cfg_attr(feature = "openapi", schema(example = 9))]
    pub hour: u32,
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub minute: u32,
    #[cfg_attr(feature = "openapi", schema(example = "9:30 AM"))]
    pub label: String,
}

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            label: format_time(hour, minute),
        }
    }

    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarDay {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2024-06-10"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(example = "Mon"))]
    pub day_name: String,
    pub day_number: u32,
    pub is_today: bool,
    pub is_weekend: bool,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            date,
            day_name: date.format("%a").to_string(),
            day_number: date.day(),
            is_today: date == today,
            is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// A Monday-to-Sunday week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarWeek {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_start: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_end: NaiveDate,
    pub days: Vec<CalendarDay>,
}

/// Week navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Direction::Prev),
            "next" => Ok(Direction::Next),
            other => Err(format!("Unknown direction '{}', expected prev or next", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Prev => write!(f, "prev"),
            Direction::Next => write!(f, "next"),
        }
    }
}

/// A booking placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarBooking {
    #[serde(flatten)]
    pub booking: Booking,
    /// Index of the slot the booking starts in; `None` outside business hours.
    pub grid_position: Option<usize>,
    /// Span in 30-minute slots, at least 1.
    pub grid_height: i64,
    #[cfg_attr(feature = "openapi", schema(example = "#3B82F6"))]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarTimeSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub date_time: DateTime<Utc>,
    pub is_available: bool,
    pub bookings: Vec<CalendarBooking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarRoomDay {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub time_slots: Vec<CalendarTimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarRoom {
    pub room: Room,
    pub days: Vec<CalendarRoomDay>,
}

/// The assembled week, one column set per room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CalendarWeekView {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_start: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub week_end: NaiveDate,
    #[cfg_attr(feature = "openapi", schema(example = "Jun 10 - 16, 2024"))]
    pub label: String,
    pub rooms: Vec<CalendarRoom>,
}

/// View settings that affect assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_weekends: bool,
    pub time_zone: Tz,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_weekends: false,
            time_zone: Tz::UTC,
        }
    }
}

// --- Slots ---

/// The 20 business-hour slots of a day, 08:00 to 17:30.
pub fn generate_time_slots() -> Vec<TimeSlot> {
    (BUSINESS_START_HOUR..BUSINESS_END_HOUR)
        .flat_map(|hour| [0, SLOT_MINUTES].map(|minute| TimeSlot::new(hour, minute)))
        .collect()
}

/// 12-hour clock label, e.g. `9:00 AM`, `12:30 PM`.
pub fn format_time(hour: u32, minute: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

/// Start instant of `slot` on `date` in `tz`.
pub fn slot_date_time(date: NaiveDate, slot: &TimeSlot, tz: &Tz) -> DateTime<Utc> {
    local_to_utc(tz, date.and_time(slot.start_time()))
}

// --- Weeks ---

pub fn is_supported_date(date: NaiveDate) -> bool {
    SUPPORTED_YEARS.contains(&date.year())
}

/// Monday of the week containing `date`; `None` before the first representable Monday.
pub fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    let back = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(back as u64))
}

/// The week containing `reference`; `today` marks the current day.
///
/// `None` when the week reaches past the representable date range.
pub fn resolve_week(reference: NaiveDate, today: NaiveDate) -> Option<CalendarWeek> {
    let week_start = start_of_week(reference)?;
    let days = (0..7)
        .map(|offset| {
            week_start
                .checked_add_days(Days::new(offset))
                .map(|date| CalendarDay::new(date, today))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(CalendarWeek {
        week_start,
        week_end: days[6].date,
        days,
    })
}

/// `date` moved one week back or forward; `None` on date overflow.
pub fn navigate_week(date: NaiveDate, direction: Direction) -> Option<NaiveDate> {
    let week = Days::new(7);
    match direction {
        Direction::Prev => date.checked_sub_days(week),
        Direction::Next => date.checked_add_days(week),
    }
}

/// `Dec 2 - 8, 2024`, or `Nov 25 - Dec 1, 2024` across months.
pub fn format_week_range(week_start: NaiveDate, week_end: NaiveDate) -> String {
    let start_month = week_start.format("%b").to_string();
    let end_month = week_end.format("%b").to_string();
    if start_month == end_month {
        format!(
            "{} {} - {}, {}",
            start_month,
            week_start.day(),
            week_end.day(),
            week_end.year()
        )
    } else {
        format!(
            "{} {} - {} {}, {}",
            start_month,
            week_start.day(),
            end_month,
            week_end.day(),
            week_end.year()
        )
    }
}

// --- Bookings on the grid ---

/// Half-open overlap of a booking with one slot of `day`.
pub fn is_booking_in_slot(
    booking_start: DateTime<Utc>,
    booking_end: DateTime<Utc>,
    day: NaiveDate,
    slot: &TimeSlot,
    tz: &Tz,
) -> bool {
    let slot_start = slot_date_time(day, slot, tz);
    let slot_end = slot_start + Duration::minutes(SLOT_MINUTES as i64);
    booking_start < slot_end && booking_end > slot_start
}

/// Duration in whole minutes, rounded half up.
pub fn booking_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds() as f64;
    (millis / 60_000.0 + 0.5).floor() as i64
}

/// Number of slots a booking spans: `max(1, round(minutes / 30))`.
pub fn grid_height(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let minutes = booking_duration_minutes(start, end) as f64;
    let slots = (minutes / SLOT_MINUTES as f64 + 0.5).floor() as i64;
    slots.max(1)
}

/// Index in `slots` of the slot containing `start`.
///
/// Starts that are not on a slot boundary are floored to the containing
/// slot (09:15 lands in 09:00). Returns `None` when no slot matches.
pub fn grid_position(start: DateTime<Utc>, slots: &[TimeSlot], tz: &Tz) -> Option<usize> {
    let local = start.with_timezone(tz);
    let hour = local.hour();
    let minute = local.minute() - local.minute() % SLOT_MINUTES;
    slots
        .iter()
        .position(|slot| slot.hour == hour && slot.minute == minute)
}

/// Stable color for a user id.
///
/// Hashes the UTF-16 code units with `h * 31 + c` in wrapping 32-bit
/// arithmetic, then picks `|h| mod 8` from [`BOOKING_PALETTE`].
pub fn booking_color(user_id: &str) -> &'static str {
    let hash = user_id
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));
    let index = (hash as i64).unsigned_abs() as usize % BOOKING_PALETTE.len();
    BOOKING_PALETTE[index]
}

/// `45m`, `2h`, `1h 30m`.
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, rest)
    }
}

fn place_booking(booking: &Booking, slots: &[TimeSlot], tz: &Tz) -> CalendarBooking {
    CalendarBooking {
        booking: booking.clone(),
        grid_position: grid_position(booking.start_time, slots, tz),
        grid_height: grid_height(booking.start_time, booking.end_time),
        color: booking_color(&booking.user_id).to_string(),
    }
}

// --- Assembly ---

/// Assemble the week containing `reference` for `rooms`.
///
/// Only confirmed bookings are placed; each room only sees its own. Weekend
/// days are left out unless `options.show_weekends` is set. An empty room
/// list yields `None` rather than a week without rooms, as does a week
/// outside the representable date range.
pub fn assemble_week(
    rooms: &[Room],
    bookings: &[Booking],
    reference: NaiveDate,
    today: NaiveDate,
    options: &ViewOptions,
) -> Option<CalendarWeekView> {
    if rooms.is_empty() {
        return None;
    }

    let week = resolve_week(reference, today)?;
    let slots = generate_time_slots();
    let tz = &options.time_zone;

    let calendar_rooms = rooms
        .iter()
        .map(|room| {
            let room_bookings: Vec<&Booking> = bookings
                .iter()
                .filter(|b| b.room_id == room.id && b.is_confirmed())
                .collect();

            let days = week
                .days
                .iter()
                .filter(|day| options.show_weekends || !day.is_weekend)
                .map(|day| {
                    let time_slots = slots
                        .iter()
                        .map(|slot| {
                            let placed: Vec<CalendarBooking> = room_bookings
                                .iter()
                                .filter(|b| {
                                    is_booking_in_slot(b.start_time, b.end_time, day.date, slot, tz)
                                })
                                .map(|b| place_booking(b, &slots, tz))
                                .collect();
                            CalendarTimeSlot {
                                slot: slot.clone(),
                                date_time: slot_date_time(day.date, slot, tz),
                                is_available: placed.is_empty(),
                                bookings: placed,
                            }
                        })
                        .collect();
                    CalendarRoomDay {
                        day: day.clone(),
                        time_slots,
                    }
                })
                .collect();

            CalendarRoom {
                room: room.clone(),
                days,
            }
        })
        .collect();

    Some(CalendarWeekView {
        week_start: week.week_start,
        week_end: week.week_end,
        label: format_week_range(week.week_start, week.week_end),
        rooms: calendar_rooms,
    })
}
