//! Administrator dashboard commands. Each run logs in, checks admin rights,
//! performs one action and ends the admin session.
use carebook_core::api::{
    self as core_api, AdminOverview, AppointmentUpdate, CliError, Credentials, DoctorDraft,
};
use chrono::Utc;
use serde_json::json;

use super::browse::find_doctor;
use super::cli::{AdminArgs, AdminCommands, DoctorFields, OutputFormat};
use super::{connect, emit};
use crate::guard::{backend_error, require_reachable};
use crate::render;

pub async fn handle_admin(
    args: AdminArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    require_reachable(&services.session.snapshot().await)?;

    let (Some(email), Some(password)) = (args.login.email, args.login.password) else {
        return Err(CliError::NotAuthenticated(
            "Admin commands need --email and --password".to_string(),
        ));
    };
    let credentials = Credentials::new(email, password)?;
    let portal = services.portal.as_ref();
    portal
        .admin_login(&credentials)
        .await
        .map_err(backend_error)?;
    if !portal.admin_check().await.map_err(backend_error)? {
        portal.admin_logout().await;
        return Err(CliError::NotAuthenticated("Admin access required".to_string()));
    }

    let result = run(portal, args.command, format).await;
    portal.admin_logout().await;
    result.map(|_| 0)
}

async fn run(
    portal: &dyn core_api::PortalService,
    command: AdminCommands,
    format: OutputFormat,
) -> Result<(), CliError> {
    match command {
        AdminCommands::Overview => {
            let users = portal.users().await.map_err(backend_error)?;
            let doctors = portal.doctors().await.map_err(backend_error)?;
            let appointments = portal.appointments().await.map_err(backend_error)?;
            let overview = AdminOverview::from_lists(&users, &doctors, &appointments);
            emit(format, &overview, || render::overview(&overview))
        }
        AdminCommands::Users { search } => {
            let users = portal.users().await.map_err(backend_error)?;
            let term = search.unwrap_or_default();
            let matched: Vec<_> = users.iter().filter(|u| u.matches(&term)).collect();
            emit(format, &matched, || render::users(&matched))
        }
        AdminCommands::Appointments => {
            let rows = portal.appointments().await.map_err(backend_error)?;
            emit(format, &rows, || render::appointments(&rows, Utc::now(), true))
        }
        AdminCommands::Complete { id } => {
            set_status(portal, id, AppointmentUpdate::COMPLETE, format).await
        }
        AdminCommands::Cancel { id } => {
            set_status(portal, id, AppointmentUpdate::CANCEL, format).await
        }
        AdminCommands::AddDoctor(fields) => {
            let draft = apply_fields(None, fields).validate()?;
            portal.add_doctor(&draft).await.map_err(backend_error)?;
            emit(format, &draft, || {
                format!("Doctor Dr. {} {} added", draft.fname, draft.lname)
            })
        }
        AdminCommands::UpdateDoctor { id, fields } => {
            let doctors = portal.doctors().await.map_err(backend_error)?;
            let current = DoctorDraft::from(find_doctor(&doctors, id)?);
            let draft = apply_fields(Some(current), fields).validate()?;
            portal
                .update_doctor(id, &draft)
                .await
                .map_err(backend_error)?;
            emit(format, &json!({ "id": id, "doctor": &draft }), || {
                format!("Doctor #{id} updated")
            })
        }
        AdminCommands::DeleteDoctor { id } => {
            portal.delete_doctor(id).await.map_err(backend_error)?;
            emit(format, &json!({ "deleted": id }), || {
                format!("Doctor #{id} deleted")
            })
        }
    }
}

async fn set_status(
    portal: &dyn core_api::PortalService,
    id: i64,
    update: AppointmentUpdate,
    format: OutputFormat,
) -> Result<(), CliError> {
    let rows = portal.appointments().await.map_err(backend_error)?;
    let appointment = rows
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| CliError::Backend("Appointment not found".to_string()))?;
    let update = update.for_appointment(appointment)?;
    portal
        .update_appointment(id, update)
        .await
        .map_err(backend_error)?;
    emit(format, &json!({ "id": id, "update": update }), || {
        let verb = if update.completed { "completed" } else { "cancelled" };
        format!("Appointment #{id} {verb}")
    })
}

/// Overlays the flags that were given onto `base` (or an empty draft).
fn apply_fields(base: Option<DoctorDraft>, fields: DoctorFields) -> DoctorDraft {
    let mut draft = base.unwrap_or_else(|| DoctorDraft {
        fname: String::new(),
        lname: String::new(),
        department: String::new(),
        description: String::new(),
        timeranges: String::new(),
        yoe: 0,
    });
    if let Some(v) = fields.fname {
        draft.fname = v;
    }
    if let Some(v) = fields.lname {
        draft.lname = v;
    }
    if let Some(v) = fields.department {
        draft.department = v;
    }
    if let Some(v) = fields.description {
        draft.description = v;
    }
    if let Some(v) = fields.timeranges {
        draft.timeranges = v;
    }
    if let Some(v) = fields.yoe {
        draft.yoe = v;
    }
    draft
}
