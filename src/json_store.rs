use crate::backend::AvailabilityBackend;
use crate::engine;
use crate::error::BookingError;
use crate::schedule;
use crate::types::{DayAvailability, DaySlots, Developer, Document, Slot, TimeRange};
use chrono::{Local, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// File-backed availability store. The committed document lives behind one
/// mutex, so every mutation is a serialized read-modify-write: concurrent
/// bookings of different slots cannot overwrite each other's changes.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: Arc<PathBuf>,
    document: Arc<Mutex<Document>>,
}

impl JsonStore {
    /// Loads the document from `path`, or seeds and persists the default
    /// document if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, BookingError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                BookingError::Persistence(io::Error::new(io::ErrorKind::InvalidData, err))
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no availability file found, seeding default document");
                let document = Document::seed();
                write_atomically(&path, &document)?;
                document
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: Arc::new(path),
            document: Arc::new(Mutex::new(document)),
        })
    }

    /// Runs one serialized read-modify-write. `transition` computes the new
    /// document from the committed snapshot; the result is written to disk
    /// first and committed to memory only after the write lands, so a failed
    /// write leaves the prior state authoritative.
    fn commit<T>(
        &self,
        transition: impl FnOnce(&Document) -> Result<(Document, T), BookingError>,
    ) -> Result<T, BookingError> {
        let mut committed = self.document.lock().unwrap();
        let (updated, outcome) = transition(&*committed)?;
        write_atomically(&self.path, &updated)?;
        *committed = updated;
        Ok(outcome)
    }
}

fn write_atomically(path: &Path, document: &Document) -> Result<(), BookingError> {
    let serialized = serde_json::to_string_pretty(document).map_err(|err| {
        BookingError::Persistence(io::Error::new(io::ErrorKind::InvalidData, err))
    })?;

    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;

    // Write to a temp file in the same directory and rename it over the
    // canonical file: rename is the only step a reader can observe, so a
    // partially written document is never visible. Dropping the temp file
    // on any earlier failure removes it.
    let mut temp = NamedTempFile::new_in(directory)?;
    temp.write_all(serialized.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| {
        warn!(path = %path.display(), error = %err.error, "failed to persist availability file");
        BookingError::Persistence(err.error)
    })?;
    Ok(())
}

impl AvailabilityBackend for JsonStore {
    fn document(&self) -> Result<Document, BookingError> {
        Ok(self.document.lock().unwrap().clone())
    }

    fn book_slot(&self, date: &str, time: &str, client_name: &str) -> Result<Slot, BookingError> {
        self.commit(|document| engine::book(document, date, time, client_name, Utc::now()))
    }

    fn cancel_slot(&self, date: &str, time: &str) -> Result<(), BookingError> {
        self.commit(|document| {
            engine::cancel(document, date, time).map(|updated| (updated, ()))
        })
    }

    fn replace_developers(&self, developers: Vec<Developer>) -> Result<(), BookingError> {
        self.commit(|document| {
            let mut updated = document.clone();
            updated.developers = developers;
            Ok((updated, ()))
        })
    }

    fn set_day_availability(
        &self,
        developer_id: &str,
        day_of_week: u32,
        times: &[String],
    ) -> Result<Vec<TimeRange>, BookingError> {
        if !(1..=7).contains(&day_of_week) {
            return Err(BookingError::validation(format!(
                "dayOfWeek {day_of_week} must be between 1 and 7"
            )));
        }
        let ranges = schedule::collapse_selected_times(times)?;
        self.commit(move |document| {
            let mut updated = document.clone();
            let developer = updated
                .developers
                .iter_mut()
                .find(|developer| developer.id == developer_id)
                .ok_or_else(|| {
                    BookingError::NotFound(format!("unknown developer '{developer_id}'"))
                })?;
            match developer
                .availability
                .iter_mut()
                .find(|day| day.day_of_week == day_of_week)
            {
                Some(day) => day.slots = ranges.clone(),
                None => {
                    developer.availability.push(DayAvailability {
                        day_of_week,
                        slots: ranges.clone(),
                    });
                    developer.availability.sort_by_key(|day| day.day_of_week);
                }
            }
            Ok((updated, ranges))
        })
    }

    fn week_availability(
        &self,
        developer_id: &str,
        week_start: &str,
    ) -> Result<Vec<DaySlots>, BookingError> {
        let week_start = engine::validate_date(week_start)?;
        let document = self.document.lock().unwrap().clone();
        let developer = document.find_developer(developer_id).ok_or_else(|| {
            BookingError::NotFound(format!("unknown developer '{developer_id}'"))
        })?;
        Ok(engine::week_availability(
            &document,
            developer,
            week_start,
            Local::now().date_naive(),
        ))
    }
}
