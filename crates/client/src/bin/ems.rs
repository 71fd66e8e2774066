use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ems_client::{
    ApiClient, ClientConfig, debug, init_auth,
    resources::range,
};
use ems_types::{
    LeaveStatus, Portal, RequestPriority, RequestType,
    leave::{LeaveDecision, NewLeave},
    request::{NewRequest, RequestClose},
    salary::PayrollCalculationRequest,
};
use platform_obs::{ObsConfig, init_tracing};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ems", version, about = "Employee Management System command line")]
struct Cli {
    /// Server origin; defaults to EMS_API_URL or http://localhost:5001.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Token file; defaults to EMS_TOKEN_FILE or ~/.config/ems/tokens.json.
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PortalArg {
    Hr,
    Employee,
}

impl From<PortalArg> for Portal {
    fn from(value: PortalArg) -> Self {
        match value {
            PortalArg::Hr => Portal::Hr,
            PortalArg::Employee => Portal::Employee,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the token for that portal.
    Login {
        #[arg(long, value_enum)]
        portal: PortalArg,
        #[arg(long)]
        email: String,
        #[arg(long, env = "EMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout {
        #[arg(long, value_enum)]
        portal: PortalArg,
    },
    /// Check which stored session is still valid.
    Status,
    /// Show what is stored locally for each portal.
    DebugAuth {
        #[arg(long, help = "Remove both stored tokens")]
        clear: bool,
    },
    /// List employees (HR).
    Employees,
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    #[command(subcommand)]
    Leave(LeaveCommand),
    #[command(subcommand)]
    Salary(SalaryCommand),
    #[command(subcommand)]
    Request(RequestCommand),
    /// Dashboard of the logged-in portal.
    Dashboard(PortalChoice),
    /// Corporate calendar events.
    Calendar(PortalChoice),
    /// Shift schedules: the organization's (HR) or your own.
    Schedule(PortalChoice),
    /// Notices: all published (HR) or those addressed to you.
    Notices(PortalChoice),
    /// Organization profile and policies (HR).
    Organization,
}

#[derive(Args, Debug)]
struct PortalChoice {
    /// Defaults to HR when an HR token is stored.
    #[arg(long, value_enum)]
    portal: Option<PortalArg>,
}

#[derive(Args, Debug)]
struct Period {
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum AttendanceCommand {
    ClockIn,
    ClockOut,
    Status,
    /// Own attendance, or an employee's history with `--employee` (HR).
    History {
        #[arg(long)]
        employee: Option<Uuid>,
        #[command(flatten)]
        period: Period,
    },
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    Apply {
        #[arg(long)]
        reason: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    Mine,
    /// All leaves of the organization (HR).
    List {
        #[arg(long, help = "Pending, Approved or Rejected")]
        status: Option<LeaveStatus>,
    },
    /// Approve or reject a leave (HR).
    Decide {
        id: Uuid,
        #[arg(help = "Approved or Rejected")]
        status: LeaveStatus,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SalaryCommand {
    Mine,
    List,
    /// Payroll from attendance for one employee (HR).
    Calculate {
        employee: Uuid,
        #[command(flatten)]
        period: Period,
        #[arg(long, default_value_t = 0.0)]
        bonus: f64,
        #[arg(long, default_value_t = 0.0)]
        deduction: f64,
        #[arg(long, help = "Store the result as a salary record")]
        save: bool,
    },
    /// Generate salaries for every active employee (HR).
    AutoPayroll {
        #[arg(long)]
        period_end: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum RequestCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "type")]
        request_type: Option<RequestType>,
        #[arg(long)]
        priority: Option<RequestPriority>,
    },
    Mine,
    List,
    Close {
        id: Uuid,
        #[arg(long)]
        comment: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config = ClientConfig::new(url, config.token_file);
    }
    if let Some(file) = &cli.token_file {
        config.token_file = file.clone();
    }
    config
}

fn resolve_portal(client: &ApiClient, choice: &PortalChoice) -> Result<Portal> {
    if let Some(portal) = choice.portal {
        return Ok(portal.into());
    }
    for portal in [Portal::Hr, Portal::Employee] {
        if client.tokens().get(portal)?.is_some() {
            return Ok(portal);
        }
    }
    bail!("not logged in; run `ems login` first")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig {
        service_name: "ems-cli",
        env_filter: Some(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string())),
        ..ObsConfig::default()
    })?;
    let cli = Cli::parse();
    let config = client_config(&cli);
    let client = ApiClient::from_config(&config).context("building HTTP client")?;

    match cli.command {
        Command::Login {
            portal,
            email,
            password,
        } => {
            let response = client.auth(portal.into()).login(&email, &password).await?;
            print_json(&response.user)
        }
        Command::Logout { portal } => {
            let message = client.auth(portal.into()).logout().await?;
            println!("{message}");
            Ok(())
        }
        Command::Status => print_json(&init_auth(&client).await?),
        Command::DebugAuth { clear } => {
            if clear {
                debug::clear_all_tokens(client.tokens())?;
            }
            print_json(&debug::debug_auth_state(client.tokens(), Utc::now())?)
        }
        Command::Employees => print_json(&client.employees().list().await?),
        Command::Attendance(command) => attendance(&client, command).await,
        Command::Leave(command) => leave(&client, command).await,
        Command::Salary(command) => salary(&client, command).await,
        Command::Request(command) => request(&client, command).await,
        Command::Dashboard(choice) => match resolve_portal(&client, &choice)? {
            Portal::Hr => print_json(&client.dashboards().hr().await?),
            Portal::Employee => print_json(&client.dashboards().employee().await?),
        },
        Command::Calendar(choice) => {
            let portal = resolve_portal(&client, &choice)?;
            print_json(&client.calendar().list(portal).await?)
        }
        Command::Schedule(choice) => match resolve_portal(&client, &choice)? {
            Portal::Hr => print_json(&client.schedules().list().await?),
            Portal::Employee => print_json(&client.schedules().mine().await?),
        },
        Command::Notices(choice) => match resolve_portal(&client, &choice)? {
            Portal::Hr => print_json(&client.notices().list().await?),
            Portal::Employee => print_json(&client.notices().mine().await?),
        },
        Command::Organization => print_json(&client.organization().info().await?),
    }
}

async fn attendance(client: &ApiClient, command: AttendanceCommand) -> Result<()> {
    let api = client.attendance();
    match command {
        AttendanceCommand::ClockIn => print_json(&api.clock_in().await?),
        AttendanceCommand::ClockOut => print_json(&api.clock_out().await?),
        AttendanceCommand::Status => print_json(&api.status().await?),
        AttendanceCommand::History { employee, period } => {
            let within = range(period.from, period.to);
            match employee {
                Some(id) => print_json(&api.history(id, &within).await?),
                None => print_json(&api.mine(&within).await?),
            }
        }
    }
}

async fn leave(client: &ApiClient, command: LeaveCommand) -> Result<()> {
    let api = client.leaves();
    match command {
        LeaveCommand::Apply {
            reason,
            title,
            from,
            to,
        } => {
            let body = NewLeave {
                title,
                reason,
                start_date: from,
                end_date: to,
            };
            print_json(&api.apply(&body).await?)
        }
        LeaveCommand::Mine => print_json(&api.mine().await?),
        LeaveCommand::List { status } => print_json(&api.list(status).await?),
        LeaveCommand::Decide {
            id,
            status,
            comment,
        } => {
            let decision = LeaveDecision {
                leave_id: id,
                status,
                comment,
            };
            print_json(&api.decide(&decision).await?)
        }
    }
}

async fn salary(client: &ApiClient, command: SalaryCommand) -> Result<()> {
    let api = client.salaries();
    match command {
        SalaryCommand::Mine => print_json(&api.mine().await?),
        SalaryCommand::List => print_json(&api.list().await?),
        SalaryCommand::Calculate {
            employee,
            period,
            bonus,
            deduction,
            save,
        } => {
            let request = PayrollCalculationRequest {
                employee_id: employee,
                start_date: period.from,
                end_date: period.to,
                bonus_percentage: bonus,
                deduction_percentage: deduction,
                save,
            };
            print_json(&api.calculate(&request).await?)
        }
        SalaryCommand::AutoPayroll { period_end } => print_json(&api.auto_payroll(period_end).await?),
    }
}

async fn request(client: &ApiClient, command: RequestCommand) -> Result<()> {
    let api = client.requests();
    match command {
        RequestCommand::Create {
            title,
            content,
            request_type,
            priority,
        } => {
            let body = NewRequest {
                title,
                content,
                request_type,
                priority,
            };
            print_json(&api.create(&body).await?)
        }
        RequestCommand::Mine => print_json(&api.mine().await?),
        RequestCommand::List => print_json(&api.list().await?),
        RequestCommand::Close { id, comment } => {
            let body = RequestClose {
                request_id: id,
                hr_comments: comment,
            };
            print_json(&api.close(&body).await?)
        }
    }
}
