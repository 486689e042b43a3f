use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Department {
    pub name: &'static str,
    pub description: &'static str,
    pub services: &'static [&'static str],
}

pub const DEPARTMENTS: &[Department] = &[
    Department {
        name: "Cardiology",
        description: "Comprehensive heart and cardiovascular care with advanced diagnostic and treatment options.",
        services: &["ECG", "Echocardiography", "Cardiac Catheterization", "Heart Surgery"],
    },
    Department {
        name: "Neurology",
        description: "Expert care for brain, spine, and nervous system disorders.",
        services: &["MRI Scans", "EEG", "Stroke Treatment", "Epilepsy Care"],
    },
    Department {
        name: "Pediatrics",
        description: "Specialized healthcare for infants, children, and adolescents.",
        services: &["Vaccinations", "Growth Monitoring", "Pediatric Surgery", "Child Psychology"],
    },
    Department {
        name: "Orthopedics",
        description: "Treatment of bone, joint, and muscle conditions and injuries.",
        services: &["Joint Replacement", "Sports Medicine", "Fracture Care", "Physical Therapy"],
    },
    Department {
        name: "Ophthalmology",
        description: "Complete eye care services from routine exams to complex surgeries.",
        services: &["Eye Exams", "Cataract Surgery", "Glaucoma Treatment", "Retinal Care"],
    },
    Department {
        name: "ENT",
        description: "Ear, nose, and throat care for all ages.",
        services: &["Hearing Tests", "Sinus Treatment", "Throat Surgery", "Allergy Care"],
    },
];

pub fn find_department(name: &str) -> Option<&'static Department> {
    DEPARTMENTS
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
}
