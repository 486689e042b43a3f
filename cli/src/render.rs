//! Plain-text views. Every function returns the full block so commands and the
//! shell print the same thing.
use std::fmt::Write as _;

use carebook_core::api::{
    AdminOverview, AdminUser, Appointment, Department, Doctor, Session, User,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::guard::SERVER_UNAVAILABLE;

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn user_line(user: &User) -> String {
    format!("{} <{}>", user.display_name(), user.email)
}

pub fn session(session: &Session, base_url: &str) -> String {
    if session.initializing {
        return "Loading...".to_string();
    }
    if !session.backend_reachable {
        return format!("Server unavailable at {base_url}\n{SERVER_UNAVAILABLE}");
    }
    match &session.identity {
        Some(user) => format!("Backend: {base_url} (reachable)\nSigned in as {}", user_line(user)),
        None => format!("Backend: {base_url} (reachable)\nNot signed in"),
    }
}

pub fn departments(list: &[Department]) -> String {
    let mut out = String::new();
    for d in list {
        let _ = writeln!(out, "{}\n  {}\n  Services: {}", d.name, d.description, d.services.join(", "));
    }
    out
}

pub fn doctors(list: &[&Doctor]) -> String {
    if list.is_empty() {
        return "No doctors found matching your criteria.".to_string();
    }
    let mut out = String::new();
    for d in list {
        let _ = write!(out, "[{}] {} - {}", d.id, d.display_name(), d.department);
        if let Some(yoe) = d.yoe {
            let _ = write!(out, " ({yoe} years experience)");
        }
        out.push('\n');
        if let Some(desc) = d.description.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(out, "    {desc}");
        }
        let slots = d.time_slots();
        if !slots.is_empty() {
            let _ = writeln!(out, "    Slots: {}", slots.join(", "));
        }
    }
    out
}

pub fn slots(doctor: &Doctor, dates: &[NaiveDate]) -> String {
    let mut out = format!("{} - {}\n", doctor.display_name(), doctor.department);
    let slots = doctor.time_slots();
    if slots.is_empty() {
        out.push_str("No time slots available\n");
        return out;
    }
    let _ = writeln!(out, "Times: {}", slots.join(", "));
    out.push_str("Dates:\n");
    for d in dates {
        let _ = writeln!(out, "  {}", d.format("%Y-%m-%d (%a)"));
    }
    out
}

pub fn appointments(list: &[Appointment], now: DateTime<Utc>, with_patient: bool) -> String {
    if list.is_empty() {
        return "No appointments yet.".to_string();
    }
    let mut out = String::new();
    for a in list {
        let _ = write!(out, "#{} {} {}", a.id, a.time, a.doctor_name());
        if let Some(dep) = &a.department {
            let _ = write!(out, " ({dep})");
        }
        if with_patient {
            if let Some(patient) = a.patient_name() {
                let _ = write!(out, " patient: {patient}");
            }
        }
        let _ = writeln!(out, " [{}]", a.status(now));
    }
    out
}

pub fn users(list: &[&AdminUser]) -> String {
    if list.is_empty() {
        return "No users found.".to_string();
    }
    let mut out = String::new();
    for u in list {
        let _ = write!(out, "[{}] {} {} <{}>", u.id, u.fname, u.lname, u.email);
        if let Some(age) = u.age {
            let _ = write!(out, " age {age}");
        }
        if let Some(phone) = &u.phone {
            let _ = write!(out, " {phone}");
        }
        out.push('\n');
    }
    out
}

pub fn overview(o: &AdminOverview) -> String {
    format!(
        "Users: {}\nDoctors: {}\nAppointments: {} (upcoming {}, completed {}, cancelled {})",
        o.total_users,
        o.total_doctors,
        o.total_appointments,
        o.upcoming_appointments,
        o.completed_appointments,
        o.cancelled_appointments
    )
}
