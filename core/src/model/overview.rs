use serde::Serialize;

use super::{AdminUser, Appointment, Doctor};

/// Dashboard counters for the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub total_users: usize,
    pub total_doctors: usize,
    pub total_appointments: usize,
    pub completed_appointments: usize,
    pub cancelled_appointments: usize,
    pub upcoming_appointments: usize,
}

impl AdminOverview {
    pub fn from_lists(users: &[AdminUser], doctors: &[Doctor], appointments: &[Appointment]) -> Self {
        let (completed, cancelled, upcoming) =
            appointments
                .iter()
                .fold((0, 0, 0), |(done, cancel, open), a| {
                    (
                        done + usize::from(a.completed),
                        cancel + usize::from(a.cancelled),
                        open + usize::from(a.is_open()),
                    )
                });
        Self {
            total_users: users.len(),
            total_doctors: doctors.len(),
            total_appointments: appointments.len(),
            completed_appointments: completed,
            cancelled_appointments: cancelled,
            upcoming_appointments: upcoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overview_counts() {
        let rows: Vec<Appointment> = serde_json::from_str(
            r#"[
                {"id":1,"doctorid":1,"time":"2025-10-21 09:00:00","completed":1,"cancelled":0},
                {"id":2,"doctorid":1,"time":"2025-10-21 10:00:00","completed":0,"cancelled":1},
                {"id":3,"doctorid":2,"time":"2025-10-22 09:00:00","completed":false,"cancelled":false},
                {"id":4,"doctorid":2,"time":"2025-10-22 10:00:00","completed":0,"cancelled":0}
            ]"#,
        )
        .unwrap();

        let overview = AdminOverview::from_lists(&[], &[], &rows);
        assert_eq!(
            overview,
            AdminOverview {
                total_users: 0,
                total_doctors: 0,
                total_appointments: 4,
                completed_appointments: 1,
                cancelled_appointments: 1,
                upcoming_appointments: 2,
            }
        );
    }
}
