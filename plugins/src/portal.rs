use anyhow::Result;
use async_trait::async_trait;
use carebook_core::api::{
    AdminUser, Appointment, AppointmentUpdate, Credentials, Doctor, DoctorDraft, NewAppointment,
    PortalService, Registration, User,
};
use reqwest::Method;
use serde::Deserialize;
use std::time::Duration;

use crate::http::{find_api_error, ApiErrorKind, HttpClient};
use crate::session::HEALTH_PATH;

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

/// REST implementation of [`PortalService`] against the clinic backend.
pub struct HttpPortal {
    client: HttpClient,
    timeout: Duration,
}

impl HttpPortal {
    pub fn new(client: HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: serde::Serialize + ?Sized + Sync,
    {
        self.client.execute(method, path, body, self.timeout).await
    }
}

#[async_trait]
impl PortalService for HttpPortal {
    fn name(&self) -> &str {
        "http"
    }

    async fn health(&self) -> Result<()> {
        self.send::<()>(Method::GET, HEALTH_PATH, None).await
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        self.send(Method::POST, "/api/register", Some(registration))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<User> {
        let resp: LoginResponse = self
            .client
            .fetch(Method::POST, "/api/login", Some(credentials), self.timeout)
            .await?;
        tracing::info!(
            target: "carebook.portal",
            stage = "portal.login.out",
            user_id = resp.user.id
        );
        Ok(resp.user)
    }

    async fn admin_login(&self, credentials: &Credentials) -> Result<()> {
        self.send(Method::POST, "/api/admin/login", Some(credentials))
            .await
    }

    async fn admin_check(&self) -> Result<bool> {
        match self.send::<()>(Method::GET, "/api/admin/check", None).await {
            Ok(()) => Ok(true),
            Err(err) => match find_api_error(&err) {
                Some(api) if api.kind() == ApiErrorKind::Status && api.is_unauthorized() => {
                    Ok(false)
                }
                _ => Err(err),
            },
        }
    }

    async fn admin_logout(&self) {
        if let Err(err) = self.send::<()>(Method::POST, "/api/logout", None).await {
            tracing::warn!(
                target: "carebook.portal",
                stage = "portal.admin_logout.ignored",
                error = %err
            );
        }
    }

    async fn doctors(&self) -> Result<Vec<Doctor>> {
        self.client.get("/api/doctors", self.timeout).await
    }

    async fn add_doctor(&self, draft: &DoctorDraft) -> Result<()> {
        self.send(Method::POST, "/api/doctors", Some(draft)).await
    }

    async fn update_doctor(&self, id: i64, draft: &DoctorDraft) -> Result<()> {
        self.send(Method::PUT, &format!("/api/doctors/{id}"), Some(draft))
            .await
    }

    async fn delete_doctor(&self, id: i64) -> Result<()> {
        self.send::<()>(Method::DELETE, &format!("/api/doctors/{id}"), None)
            .await
    }

    async fn appointments(&self) -> Result<Vec<Appointment>> {
        self.client.get("/api/appointments", self.timeout).await
    }

    async fn book_appointment(&self, booking: &NewAppointment) -> Result<()> {
        self.send(Method::POST, "/api/appointments", Some(booking))
            .await
    }

    async fn update_appointment(&self, id: i64, update: AppointmentUpdate) -> Result<()> {
        self.send(Method::PUT, &format!("/api/appointments/{id}"), Some(&update))
            .await
    }

    async fn users(&self) -> Result<Vec<AdminUser>> {
        self.client.get("/api/users", self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebook_core::api::{BackendConfig, RegistrationForm};
    use mockito::{Matcher, Server, ServerGuard};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn portal_for(server: &ServerGuard) -> HttpPortal {
        let cfg = BackendConfig {
            base_url: server.url(),
            ..BackendConfig::default()
        };
        HttpPortal::new(HttpClient::new(&cfg).unwrap(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_login_returns_user_from_envelope() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/login")
            .match_body(Matcher::Json(json!({
                "email": "ada@example.com",
                "password": "pw"
            })))
            .with_status(200)
            .with_body(
                r#"{"message":"Login successful","user":{"id":3,"fname":"Ada","lname":"Lovelace","email":"ada@example.com"}}"#,
            )
            .create_async()
            .await;

        let creds = Credentials::new("ada@example.com", "pw").unwrap();
        let user = portal_for(&server).login(&creds).await.unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_login_rejected_surfaces_backend_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/login")
            .with_status(401)
            .with_body(r#"{"error":"Invalid email or password"}"#)
            .create_async()
            .await;

        let creds = Credentials::new("ada@example.com", "nope").unwrap();
        let err = portal_for(&server).login(&creds).await.unwrap_err();
        let api = find_api_error(&err).unwrap();
        assert_eq!(api.user_message(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_register_posts_form() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/register")
            .match_body(Matcher::PartialJson(json!({
                "fname": "Grace",
                "lname": "Hopper",
                "email": "grace@example.com",
                "age": 85
            })))
            .with_status(201)
            .create_async()
            .await;

        let registration = RegistrationForm {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password: "cobol".into(),
            confirm_password: "cobol".into(),
            age: Some("85".into()),
            phone: None,
        }
        .validate()
        .unwrap();
        portal_for(&server).register(&registration).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_admin_check_maps_unauthorized_to_false() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/admin/check")
            .with_status(401)
            .create_async()
            .await;

        assert!(!portal_for(&server).admin_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_check_propagates_server_errors() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/admin/check")
            .with_status(500)
            .create_async()
            .await;

        assert!(portal_for(&server).admin_check().await.is_err());
    }

    #[tokio::test]
    async fn test_admin_logout_ignores_failures() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/logout")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        portal_for(&server).admin_logout().await;
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_doctors_decode_optional_columns() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/doctors")
            .with_status(200)
            .with_body(
                r#"[{"id":1,"fname":"Sam","lname":"Lee","department":"Cardiology","description":null,"timeranges":"09:00, 10:00","yoe":12},
                    {"id":2,"fname":"Kim","lname":"Park","department":"Neurology"}]"#,
            )
            .create_async()
            .await;

        let doctors = portal_for(&server).doctors().await.unwrap();
        assert_eq!(doctors.len(), 2);
        assert_eq!(doctors[0].time_slots(), vec!["09:00", "10:00"]);
        assert_eq!(doctors[1].yoe, None);
    }

    #[tokio::test]
    async fn test_appointments_accept_integer_flags() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/appointments")
            .with_status(200)
            .with_body(
                r#"[{"id":9,"patientid":3,"doctorid":1,"time":"2030-01-07 09:00:00","completed":0,"cancelled":1,"doctor_fname":"Sam","doctor_lname":"Lee","department":"Cardiology"}]"#,
            )
            .create_async()
            .await;

        let appts = portal_for(&server).appointments().await.unwrap();
        assert!(appts[0].cancelled);
        assert!(!appts[0].is_open());
        assert_eq!(appts[0].doctor_name(), "Dr. Sam Lee");
    }

    #[tokio::test]
    async fn test_update_appointment_puts_flags() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/api/appointments/9")
            .match_body(Matcher::Json(json!({"completed": true, "cancelled": false})))
            .with_status(200)
            .create_async()
            .await;

        portal_for(&server)
            .update_appointment(9, AppointmentUpdate::COMPLETE)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_doctor_hits_id_path() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", "/api/doctors/4")
            .with_status(200)
            .create_async()
            .await;

        portal_for(&server).delete_doctor(4).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_book_appointment_conflict() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/appointments")
            .with_status(409)
            .with_body(r#"{"error":"Time slot already booked"}"#)
            .create_async()
            .await;

        let booking = NewAppointment {
            doctorid: 1,
            time: "2030-01-07 09:00:00".into(),
        };
        let err = portal_for(&server)
            .book_appointment(&booking)
            .await
            .unwrap_err();
        let api = find_api_error(&err).unwrap();
        assert_eq!(api.status(), Some(409));
        assert_eq!(api.user_message(), "Time slot already booked");
    }
}
