//! Read-only views: status, departments, doctors and slots.
use carebook_core::api::{
    self as core_api, available_dates, departments, filter_doctors, find_department, CliError,
    ValidationError, DEPARTMENTS,
};
use serde_json::json;

use super::cli::{DepartmentsArgs, DoctorsArgs, OutputFormat, SlotsArgs};
use super::{connect, emit};
use crate::guard::{backend_error, require_reachable};
use crate::render;

/// Exits with 20 when the backend is unreachable so scripts can poll it.
pub async fn handle_status(
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    let session = services.session.wait_ready().await;
    let base_url = ctx.cfg().backend.base_url.as_str();
    emit(
        format,
        &json!({ "base_url": base_url, "session": &session }),
        || render::session(&session, base_url),
    )?;
    Ok(if session.backend_reachable { 0 } else { 20 })
}

pub fn handle_departments(args: DepartmentsArgs, format: OutputFormat) -> Result<i32, CliError> {
    let Some(name) = args.name else {
        emit(format, DEPARTMENTS, || render::departments(DEPARTMENTS))?;
        return Ok(0);
    };
    let department = find_department(&name).ok_or(ValidationError::Invalid {
        field: "department",
        value: name,
    })?;
    emit(format, department, || {
        render::departments(std::slice::from_ref(department))
    })?;
    Ok(0)
}

pub async fn handle_doctors(
    args: DoctorsArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    require_reachable(&services.session.snapshot().await)?;

    let doctors = services.portal.doctors().await.map_err(backend_error)?;
    if args.list_departments {
        let names = departments(&doctors);
        emit(format, &names, || names.join("\n"))?;
        return Ok(0);
    }
    let matched = filter_doctors(&doctors, args.search.as_deref(), args.department.as_deref());
    emit(format, &matched, || render::doctors(&matched))?;
    Ok(0)
}

pub async fn handle_slots(
    args: SlotsArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    require_reachable(&services.session.snapshot().await)?;

    let doctors = services.portal.doctors().await.map_err(backend_error)?;
    let doctor = find_doctor(&doctors, args.doctor)?;
    let dates = available_dates(chrono::Local::now().date_naive());
    emit(
        format,
        &json!({ "doctor": doctor, "dates": &dates, "times": doctor.time_slots() }),
        || render::slots(doctor, &dates),
    )?;
    Ok(0)
}

pub(crate) fn find_doctor(
    doctors: &[core_api::Doctor],
    id: i64,
) -> Result<&core_api::Doctor, CliError> {
    doctors
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| CliError::Backend("Doctor not found".to_string()))
}
