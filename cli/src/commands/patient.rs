use carebook_core::api::{
    self as core_api, available_dates, CliError, Credentials, Doctor, NewAppointment,
    RegistrationForm, User, ValidationError,
};
use chrono::{NaiveDate, Utc};
use serde_json::json;

use super::browse::find_doctor;
use super::cli::{AppointmentsArgs, BookArgs, LoginArgs, OutputFormat, RegisterArgs};
use super::{connect, emit};
use crate::guard::{backend_error, require_identity, require_reachable};
use crate::render;

/// Returns the session identity, logging in with `login` when there is none.
pub async fn sign_in(services: &core_api::Services, login: &LoginArgs) -> Result<User, CliError> {
    let session = services.session.snapshot().await;
    require_reachable(&session)?;
    if let Some(user) = session.identity {
        return Ok(user);
    }

    let (Some(email), Some(password)) = (login.email.as_deref(), login.password.as_deref()) else {
        return Err(CliError::NotAuthenticated(
            "Please log in with --email and --password".to_string(),
        ));
    };
    let credentials = Credentials::new(email, password)?;
    let user = services
        .portal
        .login(&credentials)
        .await
        .map_err(backend_error)?;
    services.session.login(user).await;

    let session = services.session.snapshot().await;
    require_identity(&session).cloned()
}

pub async fn handle_register(
    args: RegisterArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let registration = RegistrationForm {
        first_name: args.fname,
        last_name: args.lname,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        age: args.age,
        phone: args.phone,
    }
    .validate()?;

    let services = connect(ctx).await?;
    require_reachable(&services.session.snapshot().await)?;
    services
        .portal
        .register(&registration)
        .await
        .map_err(backend_error)?;

    emit(
        format,
        &json!({ "registered": &registration.email }),
        || "Registration successful! Please login.".to_string(),
    )?;
    Ok(0)
}

pub async fn handle_book(
    args: BookArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    sign_in(&services, &args.login).await?;

    let (booking, doctor) = book(&services, args.doctor, args.date, args.time.as_deref()).await?;
    emit(format, &booking, || booking_confirmation(&booking, &doctor))?;
    Ok(0)
}

/// Books a slot for the signed-in user. The date must fall inside the booking
/// window and the time must be one of the doctor's slots.
pub async fn book(
    services: &core_api::Services,
    doctor_id: i64,
    date: Option<NaiveDate>,
    time: Option<&str>,
) -> Result<(NewAppointment, Doctor), CliError> {
    let session = services.session.snapshot().await;
    let user_id = require_identity(&session)?.id;

    let doctors = services.portal.doctors().await.map_err(backend_error)?;
    let doctor = find_doctor(&doctors, doctor_id)?;
    if let Some(date) = date {
        if !available_dates(chrono::Local::now().date_naive()).contains(&date) {
            return Err(ValidationError::Invalid {
                field: "date",
                value: date.to_string(),
            }
            .into());
        }
    }
    let booking = NewAppointment::from_selection(doctor, date, time)?;

    services
        .portal
        .book_appointment(&booking)
        .await
        .map_err(backend_error)?;
    tracing::info!(
        target: "carebook.cli",
        stage = "book.done",
        user_id,
        doctor_id = doctor.id,
        time = %booking.time
    );
    Ok((booking, doctor.clone()))
}

pub fn booking_confirmation(booking: &NewAppointment, doctor: &Doctor) -> String {
    format!(
        "Appointment booked with {} on {}",
        doctor.display_name(),
        booking.time
    )
}

pub async fn handle_appointments(
    args: AppointmentsArgs,
    format: OutputFormat,
    ctx: &core_api::AppContext,
) -> Result<i32, CliError> {
    let services = connect(ctx).await?;
    sign_in(&services, &args.login).await?;

    let rows = services
        .portal
        .appointments()
        .await
        .map_err(backend_error)?;
    emit(format, &rows, || render::appointments(&rows, Utc::now(), false))?;
    Ok(0)
}
