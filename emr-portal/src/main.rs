use auth_identity::{Identity, Role};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config_engine::{Backend, ConfigLoader};
use emr_portal::{Navigator, PortalContext, PortalError};
use error_common::{EmrError, Result};
use logger_redacted::init_logging;
use patient_search::{SearchKey, SearchPhase, SearchView};
use tracing::info;

/// Valuekare EMR portal demo
#[derive(Parser, Debug)]
#[command(name = "emr-portal")]
#[command(about = "Role-based EMR portal: sign in as a demo role, browse, search patients")]
struct Args {
    /// Demo role to sign in as (demo backend)
    #[arg(short, long, default_value = "admin", env = "EMR_ROLE")]
    role: Role,

    /// Backend to talk to; overrides `api.backend` from the configuration
    #[arg(short, long, env = "EMR_BACKEND")]
    backend: Option<Backend>,

    /// Account email (http backend)
    #[arg(long, env = "EMR_EMAIL")]
    email: Option<String>,

    /// Account password (http backend)
    #[arg(long, env = "EMR_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "emr-portal.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in identity
    Whoami,
    /// Show the dashboard and sidebar for the role
    Nav,
    /// Run a patient search as if typed into the search box
    Search {
        text: String,
        /// Press Enter when exactly one patient matches
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::new()
        .with_file(&args.config)
        .with_dotenv()
        .load()?;
    if args.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(backend) = args.backend {
        config.api.backend = backend;
    }
    init_logging(&config.logging).map_err(PortalError::from)?;

    let backend = config.api.backend;
    let context = PortalContext::from_config(config)?;
    let identity = match backend {
        Backend::Demo => context.session().switch_role(args.role),
        Backend::Http => {
            let (Some(email), Some(password)) = (args.email.as_deref(), args.password.as_deref())
            else {
                return Err(EmrError::Validation(
                    "--email and --password are required with the http backend".to_string(),
                ));
            };
            context.session().sign_in(email, password, None).await?
        }
    };
    info!(backend = %backend, role = %identity.role, "Session ready");

    match args.command {
        Command::Whoami => print_identity(&identity),
        Command::Nav => print_navigation(&context)?,
        Command::Search { text, open } => run_search(&context, &text, open).await?,
    }
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("{} ({})", identity.name.bold(), identity.initials());
    println!("  email:       {}", identity.email);
    println!("  role:        {}", identity.role.to_string().bright_cyan());
    if let Some(department) = &identity.department {
        println!("  department:  {department}");
    }
    println!("  permissions: {}", identity.permissions().join(", "));
}

fn print_navigation(context: &PortalContext) -> Result<()> {
    let dashboard = context.dashboard()?;
    println!("{}", dashboard.title().bold());
    for panel in dashboard.panels() {
        println!("  · {panel}");
    }
    println!();
    for item in context.navigation() {
        println!("  {:<20} {}", item.label, item.route.path().bright_blue());
    }
    Ok(())
}

async fn run_search(context: &PortalContext, text: &str, open: bool) -> Result<()> {
    if text.trim().is_empty() {
        return Err(EmrError::Validation("search text must not be blank".to_string()));
    }

    let controller = match context.open_patient_search(None) {
        Ok(controller) => controller,
        Err(denial) => {
            println!("{} {}", "⛔".red(), denial);
            return Ok(());
        }
    };

    controller.input(text)?;
    let snapshot = controller
        .wait_for(|s| matches!(s.phase, SearchPhase::Resolved | SearchPhase::Denied))
        .await?;

    match snapshot.view() {
        SearchView::Results(patients) => {
            for patient in patients {
                println!(
                    "{} {}  {} years, {}  {}  Last visit: {}",
                    patient.uhid.bright_yellow(),
                    patient.name.bold(),
                    patient.age,
                    patient.gender,
                    patient.phone,
                    patient.last_visit.format("%Y-%m-%d")
                );
            }
        }
        SearchView::Empty { message } => println!("{message}"),
        SearchView::Denied { notice } => println!("{} {}", "⛔".red(), notice),
        SearchView::Hidden | SearchView::Loading => {}
    }
    if let Some(notice) = snapshot.notice.as_deref() {
        println!("{} {}", "⚠".yellow(), notice);
    }

    if open && snapshot.results.len() == 1 {
        controller.key(SearchKey::Enter)?;
        controller
            .wait_for(|s| s.phase == SearchPhase::Idle)
            .await?;
        println!("{} {}", "→".green(), context.router().current());
    }

    controller.shutdown().await?;
    Ok(())
}
