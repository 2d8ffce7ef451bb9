use crate::backend::AvailabilityBackend;
use crate::error::BookingError;
use crate::types::{DaySlots, Developer, Document, Slot, TimeRange};
use chrono::Utc;
use std::io;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

pub struct MockAvailabilityBackendInner {
    pub success: AtomicBool,
    pub calls_to_document: AtomicU64,
    pub calls_to_book_slot: AtomicU64,
    pub calls_to_cancel_slot: AtomicU64,
    pub calls_to_replace_developers: AtomicU64,
    pub calls_to_set_day_availability: AtomicU64,
    pub calls_to_week_availability: AtomicU64,
    pub document: Mutex<Document>,
}

#[derive(Clone)]
pub struct MockAvailabilityBackend(pub Arc<MockAvailabilityBackendInner>);

impl MockAvailabilityBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockAvailabilityBackendInner {
            success: AtomicBool::new(true),
            calls_to_document: AtomicU64::default(),
            calls_to_book_slot: AtomicU64::default(),
            calls_to_cancel_slot: AtomicU64::default(),
            calls_to_replace_developers: AtomicU64::default(),
            calls_to_set_day_availability: AtomicU64::default(),
            calls_to_week_availability: AtomicU64::default(),
            document: Mutex::new(Document::seed()),
        }))
    }

    fn succeeds(&self) -> bool {
        self.0.success.load(Ordering::SeqCst)
    }
}

impl AvailabilityBackend for MockAvailabilityBackend {
    fn document(&self) -> Result<Document, BookingError> {
        self.0.calls_to_document.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.document.lock().unwrap().clone())
    }

    fn book_slot(&self, date: &str, time: &str, client_name: &str) -> Result<Slot, BookingError> {
        self.0.calls_to_book_slot.fetch_add(1, Ordering::SeqCst);
        if !self.succeeds() {
            return Err(BookingError::Conflict(format!(
                "slot {date} {time} is already booked"
            )));
        }
        Ok(Slot {
            date: date.parse().unwrap_or_default(),
            time: time.into(),
            booked: true,
            client_name: Some(client_name.into()),
            booked_at: Some(Utc::now()),
        })
    }

    fn cancel_slot(&self, date: &str, time: &str) -> Result<(), BookingError> {
        self.0.calls_to_cancel_slot.fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(()),
            false => Err(BookingError::NotFound(format!(
                "no booking exists for {date} {time}"
            ))),
        }
    }

    fn replace_developers(&self, _developers: Vec<Developer>) -> Result<(), BookingError> {
        self.0
            .calls_to_replace_developers
            .fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(()),
            false => Err(BookingError::Persistence(io::Error::new(
                io::ErrorKind::Other,
                "supposed to fail",
            ))),
        }
    }

    fn set_day_availability(
        &self,
        developer_id: &str,
        _day_of_week: u32,
        _times: &[String],
    ) -> Result<Vec<TimeRange>, BookingError> {
        self.0
            .calls_to_set_day_availability
            .fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(vec![TimeRange {
                start: "10:30".into(),
                end: "12:00".into(),
            }]),
            false => Err(BookingError::NotFound(format!(
                "unknown developer '{developer_id}'"
            ))),
        }
    }

    fn week_availability(
        &self,
        developer_id: &str,
        _week_start: &str,
    ) -> Result<Vec<DaySlots>, BookingError> {
        self.0
            .calls_to_week_availability
            .fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(Vec::new()),
            false => Err(BookingError::NotFound(format!(
                "unknown developer '{developer_id}'"
            ))),
        }
    }
}
