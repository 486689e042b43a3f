pub mod appointment;
pub mod department;
pub mod doctor;
pub mod overview;
pub mod user;
pub mod wire;

pub use appointment::{
    available_dates, Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment,
    BOOKING_WINDOW_DAYS,
};
pub use department::{find_department, Department, DEPARTMENTS};
pub use doctor::{departments, filter_doctors, Doctor, DoctorDraft};
pub use overview::AdminOverview;
pub use user::{AdminUser, Credentials, Registration, RegistrationForm, User};
