// File: crates/roomify_calendar/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    AvailabilityResponse, NavigateResponse, SlotsResponse, UpdateBookingRequest, WeekResponse,
};
use crate::logic::{
    CalendarBooking, CalendarDay, CalendarRoom, CalendarRoomDay, CalendarTimeSlot,
    CalendarWeekView, Direction, TimeSlot,
};
use crate::service::{BookingStats, CreateBookingRequest, QuickBookingRequest};
use roomify_common::models::{Booking, BookingStatus, Room};
use roomify_common::{Notice, NoticeKind};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_week_handler,
        crate::handlers::navigate_handler,
        crate::handlers::slots_handler,
        crate::handlers::list_rooms_handler,
        crate::handlers::get_room_handler,
        crate::handlers::room_bookings_handler,
        crate::handlers::room_availability_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::quick_booking_handler,
        crate::handlers::get_booking_handler,
        crate::handlers::update_booking_handler,
        crate::handlers::cancel_booking_handler,
        crate::handlers::delete_booking_handler,
        crate::handlers::user_bookings_handler,
        crate::handlers::user_stats_handler,
        crate::handlers::notifications_handler
    ),
    components(
        schemas(
            Room,
            Booking,
            BookingStatus,
            TimeSlot,
            Direction,
            CalendarDay,
            CalendarBooking,
            CalendarTimeSlot,
            CalendarRoomDay,
            CalendarRoom,
            CalendarWeekView,
            WeekResponse,
            NavigateResponse,
            SlotsResponse,
            AvailabilityResponse,
            CreateBookingRequest,
            QuickBookingRequest,
            UpdateBookingRequest,
            BookingStats,
            Notice,
            NoticeKind
        )
    ),
    tags(
        (name = "Calendar", description = "Weekly room calendar"),
        (name = "Rooms", description = "Meeting rooms and their bookings"),
        (name = "Bookings", description = "Creating and changing bookings"),
        (name = "Users", description = "Per-user bookings and statistics"),
        (name = "Notifications", description = "Recent success and error notices")
    ),
    servers(
        (url = "/api", description = "Roomify API server")
    )
)]
pub struct CalendarApiDoc;
