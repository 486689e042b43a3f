use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub fname: String,
    pub lname: String,
    pub department: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma separated list of bookable slots, e.g. `"09:00, 10:00, 14:30"`.
    #[serde(default)]
    pub timeranges: Option<String>,
    #[serde(default)]
    pub yoe: Option<i64>,
}

impl Doctor {
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.fname, self.lname)
    }

    pub fn time_slots(&self) -> Vec<String> {
        self.timeranges
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Case-insensitive match on first name, last name or department.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.fname.to_lowercase().contains(&term)
            || self.lname.to_lowercase().contains(&term)
            || self.department.to_lowercase().contains(&term)
    }
}

/// Distinct department names present in `doctors`, sorted.
pub fn departments(doctors: &[Doctor]) -> Vec<String> {
    let mut out: Vec<String> = doctors.iter().map(|d| d.department.clone()).collect();
    out.sort();
    out.dedup();
    out
}

pub fn filter_doctors<'a>(
    doctors: &'a [Doctor],
    search: Option<&str>,
    department: Option<&str>,
) -> Vec<&'a Doctor> {
    doctors
        .iter()
        .filter(|d| search.map_or(true, |term| d.matches(term)))
        .filter(|d| department.map_or(true, |dep| d.department == dep))
        .collect()
}

/// Body of `POST /api/doctors` and `PUT /api/doctors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorDraft {
    pub fname: String,
    pub lname: String,
    pub department: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timeranges: String,
    #[serde(default)]
    pub yoe: i64,
}

impl DoctorDraft {
    pub fn validate(self) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("fname", &self.fname),
            ("lname", &self.lname),
            ("department", &self.department),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required(field));
            }
        }
        if self.yoe < 0 {
            return Err(ValidationError::Invalid {
                field: "yoe",
                value: self.yoe.to_string(),
            });
        }
        Ok(self)
    }
}

impl From<&Doctor> for DoctorDraft {
    fn from(d: &Doctor) -> Self {
        Self {
            fname: d.fname.clone(),
            lname: d.lname.clone(),
            department: d.department.clone(),
            description: d.description.clone().unwrap_or_default(),
            timeranges: d.timeranges.clone().unwrap_or_default(),
            yoe: d.yoe.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doctor(id: i64, fname: &str, department: &str, slots: Option<&str>) -> Doctor {
        Doctor {
            id,
            fname: fname.to_string(),
            lname: "House".to_string(),
            department: department.to_string(),
            description: None,
            timeranges: slots.map(str::to_string),
            yoe: Some(12),
        }
    }

    #[test]
    fn test_time_slots_trim_and_skip_blanks() {
        let d = doctor(1, "Greg", "Cardiology", Some(" 09:00,10:30 , ,14:00"));
        assert_eq!(d.time_slots(), vec!["09:00", "10:30", "14:00"]);

        let d = doctor(1, "Greg", "Cardiology", None);
        assert!(d.time_slots().is_empty());
    }

    #[test]
    fn test_filter_and_departments() {
        let all = vec![
            doctor(1, "Greg", "Neurology", None),
            doctor(2, "Lisa", "Cardiology", None),
            doctor(3, "James", "Cardiology", None),
        ];
        assert_eq!(departments(&all), vec!["Cardiology", "Neurology"]);

        let hits = filter_doctors(&all, Some("CARD"), None);
        assert_eq!(hits.len(), 2);

        let hits = filter_doctors(&all, Some("lisa"), Some("Cardiology"));
        assert_eq!(hits.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);

        let hits = filter_doctors(&all, None, Some("Neurology"));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_doctor_row_with_nulls() {
        let d: Doctor = serde_json::from_str(
            r#"{"id":9,"fname":"A","lname":"B","department":"ENT","description":null,"timeranges":null,"yoe":null}"#,
        )
        .unwrap();
        assert_eq!(DoctorDraft::from(&d).yoe, 0);
    }

    #[test]
    fn test_draft_validation() {
        let draft = DoctorDraft {
            fname: "A".into(),
            lname: "B".into(),
            department: " ".into(),
            description: String::new(),
            timeranges: String::new(),
            yoe: 0,
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::Required("department")
        );
    }
}
