use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::doctor::Doctor;
use super::wire::{bool_or_int, parse_backend_time};
use crate::error::ValidationError;

/// Days ahead (excluding today) offered by the booking calendar.
pub const BOOKING_WINDOW_DAYS: i64 = 14;

/// A row of `GET /api/appointments`.
///
/// Patients receive their own rows joined with the doctor; administrators also
/// get the `patient_*` columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub patientid: Option<i64>,
    pub doctorid: i64,
    pub time: String,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub completed: bool,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub cancelled: bool,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub doctor_fname: Option<String>,
    #[serde(default)]
    pub doctor_lname: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub patient_fname: Option<String>,
    #[serde(default)]
    pub patient_lname: Option<String>,
    #[serde(default)]
    pub patient_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Cancelled,
    Completed,
    Past,
    Upcoming,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Past => "Past",
            Self::Upcoming => "Upcoming",
        })
    }
}

impl Appointment {
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        parse_backend_time(&self.time)
    }

    /// Neither completed nor cancelled.
    pub fn is_open(&self) -> bool {
        !self.completed && !self.cancelled
    }

    pub fn status(&self, now: DateTime<Utc>) -> AppointmentStatus {
        if self.cancelled {
            return AppointmentStatus::Cancelled;
        }
        if self.completed {
            return AppointmentStatus::Completed;
        }
        match self.scheduled_at() {
            Some(at) if at < now => AppointmentStatus::Past,
            _ => AppointmentStatus::Upcoming,
        }
    }

    pub fn doctor_name(&self) -> String {
        match (&self.doctor_fname, &self.doctor_lname) {
            (Some(f), Some(l)) => format!("Dr. {f} {l}"),
            _ => format!("doctor #{}", self.doctorid),
        }
    }

    pub fn patient_name(&self) -> Option<String> {
        match (&self.patient_fname, &self.patient_lname) {
            (Some(f), Some(l)) => Some(format!("{f} {l}")),
            _ => None,
        }
    }
}

/// Body of `PUT /api/appointments/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub completed: bool,
    pub cancelled: bool,
}

impl AppointmentUpdate {
    pub const COMPLETE: Self = Self {
        completed: true,
        cancelled: false,
    };
    pub const CANCEL: Self = Self {
        completed: false,
        cancelled: true,
    };

    /// Status actions are only offered on open appointments.
    pub fn for_appointment(self, appointment: &Appointment) -> Result<Self, ValidationError> {
        if appointment.is_open() {
            Ok(self)
        } else {
            Err(ValidationError::AppointmentClosed(appointment.id))
        }
    }
}

/// Body of `POST /api/appointments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctorid: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub time: String,
}

impl NewAppointment {
    /// Builds the booking request from the calendar selection.
    ///
    /// `slot` must be one of the doctor's advertised slots.
    pub fn from_selection(
        doctor: &Doctor,
        date: Option<NaiveDate>,
        slot: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let (Some(date), Some(slot)) = (date, slot.map(str::trim).filter(|s| !s.is_empty())) else {
            return Err(ValidationError::MissingSlot);
        };
        if !doctor.time_slots().iter().any(|s| s == slot) {
            return Err(ValidationError::Invalid {
                field: "time",
                value: slot.to_string(),
            });
        }
        let time = NaiveTime::parse_from_str(slot, "%H:%M").map_err(|_| {
            ValidationError::Invalid {
                field: "time",
                value: slot.to_string(),
            }
        })?;
        Ok(Self {
            doctorid: doctor.id,
            time: format!("{} {}:00", date.format("%Y-%m-%d"), time.format("%H:%M")),
        })
    }
}

/// Bookable dates: the next [`BOOKING_WINDOW_DAYS`] days after `today`, weekends skipped.
pub fn available_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=BOOKING_WINDOW_DAYS)
        .map(|offset| today + Duration::days(offset))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}
