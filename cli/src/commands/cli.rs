use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "carebook", version, about = "Hospital appointment booking client")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL; overrides config file and CAREBOOK_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DoctorsArgs {
    /// Case-insensitive match on name or department.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    /// Only list the departments that currently have doctors.
    #[arg(long, conflicts_with_all = ["search", "department"])]
    pub list_departments: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DepartmentsArgs {
    /// Show a single department, case-insensitive.
    pub name: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SlotsArgs {
    #[arg(long)]
    pub doctor: i64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub fname: String,

    #[arg(long)]
    pub lname: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub confirm_password: String,

    #[arg(long)]
    pub age: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BookArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    #[arg(long)]
    pub doctor: i64,

    /// YYYY-MM-DD, one of the dates listed by `slots`.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// HH:MM, one of the doctor's slots.
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AppointmentsArgs {
    #[command(flatten)]
    pub login: LoginArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AdminArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DoctorFields {
    #[arg(long)]
    pub fname: Option<String>,

    #[arg(long)]
    pub lname: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Comma separated slots, e.g. "09:00, 10:00, 14:30".
    #[arg(long)]
    pub timeranges: Option<String>,

    #[arg(long)]
    pub yoe: Option<i64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommands {
    Overview,
    Users {
        #[arg(long)]
        search: Option<String>,
    },
    Appointments,
    Complete {
        id: i64,
    },
    Cancel {
        id: i64,
    },
    AddDoctor(DoctorFields),
    UpdateDoctor {
        id: i64,
        #[command(flatten)]
        fields: DoctorFields,
    },
    DeleteDoctor {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Probe the backend and show the session state.
    Status,
    Departments(DepartmentsArgs),
    Doctors(DoctorsArgs),
    Slots(SlotsArgs),
    Register(RegisterArgs),
    Book(BookArgs),
    Appointments(AppointmentsArgs),
    Admin(AdminArgs),
    /// Interactive session.
    Shell,
}
