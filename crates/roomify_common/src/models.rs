// --- File: crates/roomify_common/src/models.rs ---

// Entities owned by the data store, plus the request types used to change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable meeting room.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub floor: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Room {
    /// A minimal active room, handy for seeding stores and tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            description: None,
            location: None,
            equipment: Vec::new(),
            features: Vec::new(),
            image_url: None,
            floor: None,
            is_active: true,
            created_at: None,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Pending,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
        }
    }
}

/// A reservation of one room by one user.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Maintained by the store. Zero when a row omits it; read through
    /// [`Booking::minutes`].
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Stored duration, or the minutes between start and end when none was stored.
    pub fn minutes(&self) -> i64 {
        if self.duration_minutes > 0 {
            self.duration_minutes
        } else {
            (self.end_time - self.start_time).num_minutes().max(0)
        }
    }

    /// Half-open overlap with `[start, end)`: touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Insert payload for a new booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub room_id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Partial update of a booking; `None` fields are left untouched.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

impl BookingUpdate {
    pub fn changes_times(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}

/// Room list filters. Unset fields do not filter.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomFilters {
    /// Case-insensitive match against name, description or location.
    pub search: Option<String>,
    pub capacity_min: Option<i32>,
    pub capacity_max: Option<i32>,
    pub location: Option<String>,
    pub floor: Option<i32>,
    /// Every listed item must be present on the room.
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl RoomFilters {
    pub fn matches(&self, room: &Room) -> bool {
        if !room.is_active {
            return false;
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = |field: Option<&str>| {
                field.is_some_and(|value| value.to_lowercase().contains(&needle))
            };
            if !(hit(Some(&room.name))
                || hit(room.description.as_deref())
                || hit(room.location.as_deref()))
            {
                return false;
            }
        }
        if self.capacity_min.is_some_and(|min| room.capacity < min) {
            return false;
        }
        if self.capacity_max.is_some_and(|max| room.capacity > max) {
            return false;
        }
        if let Some(location) = &self.location {
            if room.location.as_ref() != Some(location) {
                return false;
            }
        }
        if self.floor.is_some() && room.floor != self.floor {
            return false;
        }
        self.equipment.iter().all(|e| room.equipment.contains(e))
            && self.features.iter().all(|f| room.features.contains(f))
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-change notification for the bookings table.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingChange {
    pub kind: ChangeKind,
    pub new: Option<Booking>,
    pub old: Option<Booking>,
}

impl BookingChange {
    pub fn inserted(booking: Booking) -> Self {
        Self {
            kind: ChangeKind::Insert,
            new: Some(booking),
            old: None,
        }
    }

    pub fn updated(old: Booking, new: Booking) -> Self {
        Self {
            kind: ChangeKind::Update,
            new: Some(new),
            old: Some(old),
        }
    }

    pub fn deleted(old: Booking) -> Self {
        Self {
            kind: ChangeKind::Delete,
            new: None,
            old: Some(old),
        }
    }

    /// Room the change belongs to, taken from whichever row is present.
    pub fn room_id(&self) -> Option<&str> {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .map(|b| b.room_id.as_str())
    }
}
