//! Interactive loop over a single session. `retry` throws the session away and
//! starts a new one, which is the only way to re-probe the backend.
use std::io::Write as _;

use carebook_core::api::{self as core_api, filter_doctors, CliError, Credentials};
use chrono::{NaiveDate, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::browse::find_doctor;
use super::connect;
use super::patient::{book, booking_confirmation};
use crate::guard::{backend_error, require_identity, require_reachable};
use crate::render;

const HELP: &str = "\
commands:
  status                        backend and sign-in state
  login <email> <password>
  logout
  whoami
  doctors [search]
  slots <doctor-id>
  book <doctor-id> <YYYY-MM-DD> <HH:MM>
  appointments
  retry                         reconnect from scratch
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Login { email: String, password: String },
    Logout,
    Whoami,
    Doctors { search: Option<String> },
    Slots { doctor: i64 },
    Book { doctor: i64, date: NaiveDate, time: String },
    Appointments,
    Retry,
    Quit,
}

impl ShellCommand {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = parts.collect();
        let cmd = match (head, rest.as_slice()) {
            ("help" | "?", _) => Self::Help,
            ("status", []) => Self::Status,
            ("login", [email, password]) => Self::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("logout", []) => Self::Logout,
            ("whoami", []) => Self::Whoami,
            ("doctors", terms) => Self::Doctors {
                search: (!terms.is_empty()).then(|| terms.join(" ")),
            },
            ("slots", [id]) => Self::Slots {
                doctor: parse_id(id)?,
            },
            ("book", [id, date, time]) => Self::Book {
                doctor: parse_id(id)?,
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date: {date} (expected YYYY-MM-DD)"))?,
                time: time.to_string(),
            },
            ("appointments", []) => Self::Appointments,
            ("retry", []) => Self::Retry,
            ("quit" | "exit", []) => Self::Quit,
            _ => return Err(format!("unrecognized command: {}", line.trim())),
        };
        Ok(Some(cmd))
    }
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|_| format!("invalid id: {raw}"))
}

pub async fn handle_shell(ctx: &core_api::AppContext) -> Result<i32, CliError> {
    let mut services = connect(ctx).await?;
    let base_url = ctx.cfg().backend.base_url.clone();
    println!("{}", render::session(&services.session.snapshot().await, &base_url));
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("carebook> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let cmd = match ShellCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match cmd {
            ShellCommand::Quit => break,
            ShellCommand::Retry => {
                println!("Loading...");
                services = connect(ctx).await?;
                println!("{}", render::session(&services.session.snapshot().await, &base_url));
            }
            other => match run(&services, other, &base_url).await {
                Ok(out) => println!("{}", out.trim_end()),
                Err(err) => println!("error: {err}"),
            },
        }
    }
    Ok(0)
}

async fn run(
    services: &core_api::Services,
    cmd: ShellCommand,
    base_url: &str,
) -> Result<String, CliError> {
    let session = services.session.snapshot().await;
    match cmd {
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Status => Ok(render::session(&session, base_url)),
        ShellCommand::Login { email, password } => {
            require_reachable(&session)?;
            let credentials = Credentials::new(email, password)?;
            let user = services
                .portal
                .login(&credentials)
                .await
                .map_err(backend_error)?;
            let line = format!("Signed in as {}", render::user_line(&user));
            services.session.login(user).await;
            Ok(line)
        }
        ShellCommand::Logout => {
            services.session.logout().await;
            Ok("Signed out".to_string())
        }
        ShellCommand::Whoami => Ok(match &session.identity {
            Some(user) => render::user_line(user),
            None => "Not signed in".to_string(),
        }),
        ShellCommand::Doctors { search } => {
            require_reachable(&session)?;
            let doctors = services.portal.doctors().await.map_err(backend_error)?;
            Ok(render::doctors(&filter_doctors(&doctors, search.as_deref(), None)))
        }
        ShellCommand::Slots { doctor } => {
            require_reachable(&session)?;
            let doctors = services.portal.doctors().await.map_err(backend_error)?;
            let doctor = find_doctor(&doctors, doctor)?;
            let dates = core_api::available_dates(chrono::Local::now().date_naive());
            Ok(render::slots(doctor, &dates))
        }
        ShellCommand::Book { doctor, date, time } => {
            let (booking, doctor) = book(services, doctor, Some(date), Some(&time)).await?;
            Ok(booking_confirmation(&booking, &doctor))
        }
        ShellCommand::Appointments => {
            require_identity(&session)?;
            let rows = services
                .portal
                .appointments()
                .await
                .map_err(backend_error)?;
            Ok(render::appointments(&rows, Utc::now(), false))
        }
        ShellCommand::Retry | ShellCommand::Quit => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(ShellCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            ShellCommand::parse("login ada@example.com s3cret"),
            Ok(Some(ShellCommand::Login {
                email: "ada@example.com".into(),
                password: "s3cret".into(),
            }))
        );
    }

    #[test]
    fn test_parse_doctors_multiword_search() {
        assert_eq!(
            ShellCommand::parse("doctors general medicine"),
            Ok(Some(ShellCommand::Doctors {
                search: Some("general medicine".into())
            }))
        );
        assert_eq!(
            ShellCommand::parse("doctors"),
            Ok(Some(ShellCommand::Doctors { search: None }))
        );
    }

    #[test]
    fn test_parse_book() {
        assert_eq!(
            ShellCommand::parse("book 3 2030-01-07 09:00"),
            Ok(Some(ShellCommand::Book {
                doctor: 3,
                date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
                time: "09:00".into(),
            }))
        );
        assert!(ShellCommand::parse("book x 2030-01-07 09:00").is_err());
        assert!(ShellCommand::parse("book 3 07-01-2030 09:00").is_err());
    }

    #[test]
    fn test_parse_rejects_extra_arguments() {
        assert!(ShellCommand::parse("logout now").is_err());
        assert!(ShellCommand::parse("dance").is_err());
        assert_eq!(ShellCommand::parse("exit"), Ok(Some(ShellCommand::Quit)));
    }
}
