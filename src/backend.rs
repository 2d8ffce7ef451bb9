use crate::error::BookingError;
use crate::types::{DaySlots, Developer, Document, Slot, TimeRange};

/// Storage seam between the HTTP layer and the persisted document.
pub trait AvailabilityBackend: Clone + Send + Sync + 'static {
    /// Current committed document.
    fn document(&self) -> Result<Document, BookingError>;

    /// Books `(date, time)` for `client_name` and persists before returning.
    fn book_slot(&self, date: &str, time: &str, client_name: &str) -> Result<Slot, BookingError>;

    /// Removes the booking at `(date, time)` and persists.
    fn cancel_slot(&self, date: &str, time: &str) -> Result<(), BookingError>;

    /// Replaces the full developer list (template editing) and persists.
    fn replace_developers(&self, developers: Vec<Developer>) -> Result<(), BookingError>;

    /// Collapses one day's toggled grid times into ranges, stores them on
    /// the developer's template and persists. Returns the collapsed ranges.
    fn set_day_availability(
        &self,
        developer_id: &str,
        day_of_week: u32,
        times: &[String],
    ) -> Result<Vec<TimeRange>, BookingError>;

    /// Derived per-day availability for the 7 days starting at `week_start`.
    fn week_availability(
        &self,
        developer_id: &str,
        week_start: &str,
    ) -> Result<Vec<DaySlots>, BookingError>;
}
