use async_trait::async_trait;

use crate::model::{
    AdminUser, Appointment, AppointmentUpdate, Credentials, Doctor, DoctorDraft, NewAppointment,
    Registration, User,
};

/// Domain calls the consumer views make directly against the backend.
///
/// These share the session's credential transport but are not part of the
/// session state: every call is a plain request/response with no retry.
#[async_trait]
pub trait PortalService: Send + Sync {
    fn name(&self) -> &str;

    async fn health(&self) -> anyhow::Result<()>;

    async fn register(&self, registration: &Registration) -> anyhow::Result<()>;
    /// The confirmed identity to hand to `SessionManager::login`.
    async fn login(&self, credentials: &Credentials) -> anyhow::Result<User>;

    async fn admin_login(&self, credentials: &Credentials) -> anyhow::Result<()>;
    /// `true` when the stored credentials carry admin rights.
    async fn admin_check(&self) -> anyhow::Result<bool>;
    /// Ends the admin session on the backend. Failures are swallowed.
    async fn admin_logout(&self);

    async fn doctors(&self) -> anyhow::Result<Vec<Doctor>>;
    async fn add_doctor(&self, draft: &DoctorDraft) -> anyhow::Result<()>;
    async fn update_doctor(&self, id: i64, draft: &DoctorDraft) -> anyhow::Result<()>;
    async fn delete_doctor(&self, id: i64) -> anyhow::Result<()>;

    async fn appointments(&self) -> anyhow::Result<Vec<Appointment>>;
    async fn book_appointment(&self, booking: &NewAppointment) -> anyhow::Result<()>;
    async fn update_appointment(&self, id: i64, update: AppointmentUpdate) -> anyhow::Result<()>;

    async fn users(&self) -> anyhow::Result<Vec<AdminUser>>;
}
