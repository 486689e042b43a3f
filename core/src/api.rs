//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `carebook_core::api` instead of reaching into internal modules.

pub use crate::config::{
    get_carebook_data_dir, load_default, validate, AppConfig, BackendConfig, CredentialTransport,
    LoggingConfig,
};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::error::{CliError, ConfigError, ValidationError};
pub use crate::model::{
    available_dates, departments, filter_doctors, find_department, AdminOverview, AdminUser,
    Appointment, AppointmentStatus, AppointmentUpdate, Credentials, Department, Doctor,
    DoctorDraft, NewAppointment, Registration, RegistrationForm, User, DEPARTMENTS,
};
pub use crate::portal::PortalService;
pub use crate::session::{
    Session, SessionBackend, SessionEvent, SessionManager, SessionPhase, SessionTimeouts,
};
