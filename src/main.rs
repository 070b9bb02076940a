use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use job_compass::{
    config::{get_config, init_config, LogFormat},
    dto::job_dto::JobApplicationPayload,
    error::Error,
    models::{analytics::Period, job_application::Status, settings::Theme},
    routes::{navigator::Navigator, Route},
    services::{
        application_service::{self, HomeView},
        auth_service,
        collection_view::SortSpec,
        settings_service::{self, SettingsView},
    },
    utils::time::to_date_string,
    AppState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Track job applications from the terminal")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the cached session
    Whoami,
    /// Resolve a client path the way the browser would
    Open { path: String },
    /// List applications with search, sort and paging
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, default_value = "dateOfApplication-desc")]
        sort: SortSpec,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, help = "Application date (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<Status>,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<Status>,
    },
    Status { id: String, status: Status },
    Delete { id: String },
    Analytics {
        #[arg(long, default_value = "monthly")]
        period: Period,
        #[arg(long, help = "Derive counts from the application list")]
        local: bool,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        confirm_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        confirm_email: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        weekly_reminder: Option<bool>,
        #[arg(long)]
        monthly_reminder: Option<bool>,
        #[arg(long)]
        email_notification: Option<bool>,
    },
    #[command(name = "upload-picture")]
    UploadPicture { path: PathBuf },
    /// Flip between light and dark and save
    Theme,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_config()?;
    let config = get_config();
    init_tracing(cli.verbose, config.log_format);

    let state = AppState::new(config)?;
    let mut nav = state.navigator();

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            nav.go(Route::Register)?;
            state
                .auth_service
                .register(&name, &email, &password)
                .await
                .map_err(|e| notice_error(e, auth_service::REGISTER_FAILED))?;
            println!("{}", auth_service::REGISTER_SUCCESS);
            nav.go(Route::SignIn)?;
        }
        Commands::Login { email, password } => {
            nav.go(Route::SignIn)?;
            let session = state
                .auth_service
                .login(&email, &password)
                .await
                .map_err(|e| notice_error(e, auth_service::LOGIN_FAILED))?;
            nav.go(Route::Home)?;
            println!("Signed in as {}", session.user_name);
        }
        Commands::Logout => {
            nav.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = state.session.session()?;
            if session.is_logged_in() {
                println!("{} ({})", session.user_name, session.profile_picture_url);
            } else {
                println!("Not signed in");
            }
        }
        Commands::Open { path } => {
            let navigation = nav.navigate(&path)?;
            println!("{}", navigation.location);
            if navigation.was_redirected() {
                println!("  redirected from {}", navigation.requested);
            }
            let links = nav
                .menu_links()?
                .iter()
                .map(|r| r.path())
                .collect::<Vec<_>>()
                .join(" ");
            println!("  brand -> {}  menu: {}", nav.brand_target()?, links);
        }
        Commands::List {
            search,
            sort,
            page,
            page_size,
        } => {
            require(&mut nav, Route::Home)?;
            let mut home = match page_size {
                Some(size) => HomeView::new(size),
                None => state.application_service.new_view(),
            };
            state
                .application_service
                .load(&mut home)
                .await
                .map_err(|e| user_error(e, application_service::LOAD_FAILED))?;
            home.set_search(search);
            home.set_sort(sort);
            home.set_page(page);
            print_home(&home);
        }
        Commands::Add {
            title,
            company,
            url,
            location,
            date,
            status,
        } => {
            require(&mut nav, Route::Home)?;
            let mut home = state.application_service.new_view();
            home.form = JobApplicationPayload {
                job_url: url,
                job_title: Some(title),
                date_of_application: date,
                company: Some(company),
                location,
                status,
            };
            state
                .application_service
                .submit_form(&mut home)
                .await
                .map_err(|e| user_error(e, application_service::SAVE_FAILED))?;
            println!("Saved. {} applications tracked.", home.applications.len());
        }
        Commands::Edit {
            id,
            title,
            company,
            url,
            location,
            date,
            status,
        } => {
            require(&mut nav, Route::Home)?;
            let mut home = state.application_service.new_view();
            state
                .application_service
                .reload(&mut home)
                .await
                .map_err(|e| user_error(e, application_service::LOAD_FAILED))?;
            home.begin_edit(&id)?;
            home.form.apply(JobApplicationPayload {
                job_url: url,
                job_title: title,
                date_of_application: date,
                company,
                location,
                status,
            });
            state
                .application_service
                .submit_form(&mut home)
                .await
                .map_err(|e| user_error(e, application_service::SAVE_FAILED))?;
            println!("Updated {}", id);
        }
        Commands::Status { id, status } => {
            require(&mut nav, Route::Home)?;
            let mut home = state.application_service.new_view();
            state
                .application_service
                .update_status(&mut home, &id, status)
                .await
                .map_err(|e| user_error(e, application_service::STATUS_FAILED))?;
            println!("{} is now {}", id, status);
        }
        Commands::Delete { id } => {
            require(&mut nav, Route::Home)?;
            let mut home = state.application_service.new_view();
            state
                .application_service
                .delete(&mut home, &id)
                .await
                .map_err(|e| user_error(e, application_service::DELETE_FAILED))?;
            println!("Deleted {}", id);
        }
        Commands::Analytics { period, local } => {
            require(&mut nav, Route::Analytics)?;
            let report = state
                .analytics_service
                .report(period, local)
                .await
                .map_err(|e| user_error(e, "Failed to load analytics."))?;
            for (label, value) in &report.cards {
                println!("{:<24} {}", label, value);
            }
            println!();
            println!(
                "{:<10} {:>8} {:>10} {:>10} {:>9}",
                "period", "applied", "interview", "in review", "rejected"
            );
            for (key, counts) in &report.series {
                println!(
                    "{:<10} {:>8} {:>10} {:>10} {:>9}",
                    key, counts.applied, counts.interview, counts.in_review, counts.rejected
                );
            }
        }
        Commands::Settings { command } => {
            require(&mut nav, Route::Settings)?;
            run_settings(&state, command).await?;
        }
    }

    Ok(())
}

async fn run_settings(state: &AppState, command: SettingsCommands) -> anyhow::Result<()> {
    let service = &state.settings_service;
    let mut view = SettingsView::default();
    service
        .load(&mut view)
        .await
        .map_err(|e| user_error(e, settings_service::LOAD_FAILED))?;

    match command {
        SettingsCommands::Show => {
            let s = &view.settings;
            println!("name:               {}", s.name);
            println!("email:              {}", s.email);
            println!("theme:              {}", s.theme);
            println!("weekly reminder:    {}", s.weekly_reminder);
            println!("monthly reminder:   {}", s.monthly_reminder);
            println!("email notification: {}", s.email_notification);
            println!(
                "profile picture:    {}",
                state.session.session()?.profile_picture_url
            );
            return Ok(());
        }
        SettingsCommands::Update {
            name,
            confirm_name,
            email,
            confirm_email,
            current_password,
            new_password,
            confirm_password,
            theme,
            weekly_reminder,
            monthly_reminder,
            email_notification,
        } => {
            let draft = &mut view.draft;
            draft.new_name = name.unwrap_or_default();
            draft.confirm_new_name = confirm_name.unwrap_or_default();
            draft.new_email = email.unwrap_or_default();
            draft.confirm_new_email = confirm_email.unwrap_or_default();
            draft.current_password = current_password.unwrap_or_default();
            draft.new_password = new_password.unwrap_or_default();
            draft.confirm_password = confirm_password.unwrap_or_default();
            if let Some(theme) = theme {
                view.set_theme(theme);
            }
            if let Some(enabled) = weekly_reminder {
                view.set_weekly_reminder(enabled);
            }
            if let Some(enabled) = monthly_reminder {
                view.set_monthly_reminder(enabled);
            }
            if let Some(enabled) = email_notification {
                view.set_email_notification(enabled);
            }
            service
                .submit(&mut view)
                .await
                .map_err(|e| user_error(e, settings_service::UPDATE_FAILED))?;
        }
        SettingsCommands::UploadPicture { path } => {
            service.select_picture(&mut view, &path).await?;
            service
                .upload_picture(&mut view)
                .await
                .map_err(|e| user_error(e, settings_service::UPLOAD_FAILED))?;
        }
        SettingsCommands::Theme => {
            view.toggle_theme();
            service
                .submit(&mut view)
                .await
                .map_err(|e| user_error(e, settings_service::UPDATE_FAILED))?;
            println!("Theme: {}", view.settings.theme);
        }
    }

    if let Some(message) = &view.success {
        println!("{}", message);
    }
    Ok(())
}

/// Runs the access guard for a guarded command; nothing is fetched when the
/// guard redirects.
fn require(nav: &mut Navigator, route: Route) -> anyhow::Result<()> {
    let navigation = nav.go(route)?;
    if navigation.was_redirected() {
        anyhow::bail!(
            "{} requires a session; redirected to {}. Run `job-compass login` first.",
            route,
            navigation.location
        );
    }
    Ok(())
}

fn print_home(home: &HomeView) {
    let page = home.visible();
    println!(
        "{} ({})",
        home.profile.user_name, home.profile.profile_picture_url
    );
    println!(
        "{:<26} {:<12} {:<28} {:<20} {:<16} {}",
        "id", "date", "title", "company", "location", "status"
    );
    for app in &page.items {
        println!(
            "{:<26} {:<12} {:<28} {:<20} {:<16} {}",
            app.id,
            to_date_string(app.date_of_application),
            app.job_title,
            app.company,
            app.location,
            app.status
        );
    }
    println!(
        "page {} of {} ({} matching, sorted by {})",
        page.page,
        page.total_pages,
        page.total_items,
        home.view.sort_spec()
    );
}

fn user_error(err: Error, fallback: &str) -> anyhow::Error {
    tracing::debug!(error = %err, "Command failed");
    anyhow::anyhow!(err.user_message(fallback))
}

fn notice_error(err: Error, fixed: &str) -> anyhow::Error {
    tracing::debug!(error = %err, "Command failed");
    anyhow::anyhow!(err.notice(fixed))
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
