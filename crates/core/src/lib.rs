pub mod booking;
pub mod clock;
pub mod config;
pub mod dates;
pub mod domain;
pub mod errors;
pub mod notify;
pub mod receipt;
pub mod reporting;

pub use booking::{parse_guest_count, parse_text_field, BookingRequest, StayRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{format_date, parse_calendar_date, DateRange, StayDates};
pub use domain::booking::{Booking, BookingId, BookingStatus, StayRecord};
pub use domain::guest::{Guest, GuestId};
pub use domain::room::{Room, RoomId};
pub use errors::{ApplicationError, BookingError, InterfaceError};
pub use notify::{
    DeliveryStatus, EmailMessage, ImmediateSink, MemoryNotifier, NotificationDispatcher,
    NotificationEvent, NotificationSink, Notifier, NotifyError, SilentSink,
};
pub use receipt::Receipt;
pub use reporting::{
    DailyStats, InventoryCounts, OccupancyRow, OccupancyStatus, ScheduleRow, ScheduleStatus,
};
