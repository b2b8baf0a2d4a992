use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use client_core::{
    config, FileSessionStore, FormViewController, HttpQuizApi, ListViewController,
    LoginViewController, NavIntent, NoticeKind, Notifier, QuizApi, SessionStore,
    SignupViewController,
};
use shared::domain::QuizId;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Console client for the quiz management API")]
struct Args {
    /// Base URL of the quiz API; overrides console.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Path of the session file; overrides console.toml and environment.
    #[arg(long)]
    session_path: Option<PathBuf>,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => println!("[ok] {message}"),
            NoticeKind::Error => println!("[error] {message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Login,
    Signup,
    Dashboard,
    Create,
    Edit(QuizId),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DashboardCommand {
    Refresh,
    Filter(String),
    Add,
    Edit(QuizId),
    Delete(QuizId),
    Logout,
    Quit,
    Help,
}

fn parse_dashboard_command(line: &str) -> Result<DashboardCommand, String> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();
    match head {
        "refresh" | "r" => Ok(DashboardCommand::Refresh),
        "filter" | "f" => Ok(DashboardCommand::Filter(rest.to_string())),
        "add" | "a" => Ok(DashboardCommand::Add),
        "edit" | "e" => parse_quiz_id(rest).map(DashboardCommand::Edit),
        "delete" | "d" => parse_quiz_id(rest).map(DashboardCommand::Delete),
        "logout" => Ok(DashboardCommand::Logout),
        "quit" | "q" => Ok(DashboardCommand::Quit),
        "help" | "h" | "" => Ok(DashboardCommand::Help),
        other => Err(format!("unknown command '{other}'; type 'help'")),
    }
}

fn parse_quiz_id(raw: &str) -> Result<QuizId, String> {
    raw.parse::<i64>()
        .map(QuizId)
        .map_err(|_| format!("expected a numeric quiz id, got '{raw}'"))
}

fn read_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path.display().to_string();
    }
    info!(api_url = %settings.api_url, "starting quiz console");

    let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(settings.api_url.as_str()));
    let sessions: Arc<dyn SessionStore> =
        Arc::new(FileSessionStore::new(settings.session_path.as_str()));
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    let mut route = if sessions.load().is_some() {
        Route::Dashboard
    } else {
        Route::Login
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while route != Route::Exit {
        route = match route {
            Route::Login => login_route(&api, &sessions, &mut lines).await?,
            Route::Signup => signup_route(&api, &mut lines).await?,
            Route::Dashboard => dashboard_route(&api, &sessions, &notifier, &mut lines).await?,
            Route::Create => form_route(&api, &notifier, None, &mut lines).await?,
            Route::Edit(id) => form_route(&api, &notifier, Some(id), &mut lines).await?,
            Route::Exit => Route::Exit,
        };
    }
    Ok(())
}

async fn login_route(
    api: &Arc<dyn QuizApi>,
    sessions: &Arc<dyn SessionStore>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Route> {
    println!();
    println!("Log in ('signup' to create an account, 'quit' to exit)");
    let controller = LoginViewController::new(api.clone(), sessions.clone());
    loop {
        let Some(username) = read_line(lines, "username: ")? else {
            return Ok(Route::Exit);
        };
        match username.as_str() {
            "quit" => return Ok(Route::Exit),
            "signup" => return Ok(Route::Signup),
            _ => {}
        }
        let Some(password) = read_line(lines, "password: ")? else {
            return Ok(Route::Exit);
        };
        controller.set_username(username).await;
        controller.set_password(password).await;
        if let Some(NavIntent::ToDashboard) = controller.submit().await {
            return Ok(Route::Dashboard);
        }
        if let Some(error) = controller.error().await {
            println!("{error}");
        }
    }
}

async fn signup_route(
    api: &Arc<dyn QuizApi>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Route> {
    println!();
    println!("Create your account ('login' to go back, 'quit' to exit)");
    let controller = SignupViewController::new(api.clone());
    loop {
        let Some(username) = read_line(lines, "username: ")? else {
            return Ok(Route::Exit);
        };
        match username.as_str() {
            "quit" => return Ok(Route::Exit),
            "login" => return Ok(Route::Login),
            _ => {}
        }
        let Some(password) = read_line(lines, "password: ")? else {
            return Ok(Route::Exit);
        };
        controller.set_username(username).await;
        controller.set_password(password).await;
        if let Some(NavIntent::ToDashboard) = controller.submit().await {
            return Ok(Route::Dashboard);
        }
        if let Some(error) = controller.error().await {
            println!("{error}");
        }
    }
}

async fn dashboard_route(
    api: &Arc<dyn QuizApi>,
    sessions: &Arc<dyn SessionStore>,
    notifier: &Arc<dyn Notifier>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Route> {
    let controller = ListViewController::new(api.clone(), notifier.clone());
    controller.refresh().await;
    loop {
        render_dashboard(&controller).await;
        let Some(line) = read_line(lines, "dashboard> ")? else {
            return Ok(Route::Exit);
        };
        match parse_dashboard_command(&line) {
            Ok(DashboardCommand::Refresh) => controller.refresh().await,
            Ok(DashboardCommand::Filter(text)) => controller.set_filter(text).await,
            Ok(DashboardCommand::Add) => return Ok(Route::Create),
            Ok(DashboardCommand::Edit(id)) => return Ok(Route::Edit(id)),
            Ok(DashboardCommand::Delete(id)) => controller.remove(id).await,
            Ok(DashboardCommand::Logout) => {
                if let Err(err) = sessions.clear() {
                    warn!(error = %err, "failed to clear session");
                }
                notifier.notify(NoticeKind::Success, "Logged out successfully");
                return Ok(Route::Login);
            }
            Ok(DashboardCommand::Quit) => return Ok(Route::Exit),
            Ok(DashboardCommand::Help) => print_dashboard_help(),
            Err(message) => println!("{message}"),
        }
    }
}

async fn render_dashboard(controller: &ListViewController) {
    let filter = controller.filter_text().await;
    let quizzes = controller.filtered().await;
    println!();
    if filter.is_empty() {
        println!("My quiz collection ({} quizzes)", quizzes.len());
    } else {
        println!(
            "My quiz collection (filter '{filter}', {} shown)",
            quizzes.len()
        );
    }
    if quizzes.is_empty() {
        println!("  No quizzes found.");
        return;
    }
    for quiz in quizzes {
        println!(
            "  #{} {} - created {}",
            quiz.id.0,
            quiz.title,
            quiz.created_at.format("%Y-%m-%d")
        );
        println!("      {}", quiz.description);
    }
}

fn print_dashboard_help() {
    println!("commands:");
    println!("  refresh            reload the quiz list from the server");
    println!("  filter <text>      show only quizzes whose title contains <text>");
    println!("  add                create a new quiz");
    println!("  edit <id>          edit the quiz with the given id");
    println!("  delete <id>        delete the quiz with the given id");
    println!("  logout             clear the session and return to login");
    println!("  quit               exit");
}

async fn form_route(
    api: &Arc<dyn QuizApi>,
    notifier: &Arc<dyn Notifier>,
    id: Option<QuizId>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Route> {
    let controller = match id {
        Some(id) => FormViewController::edit(api.clone(), notifier.clone(), id).await,
        None => FormViewController::create(api.clone(), notifier.clone()),
    };
    println!();
    if controller.is_editing().await {
        println!("Modify your quiz (empty input keeps the current value, 'discard' goes back)");
    } else {
        println!("Design a new quiz ('discard' goes back)");
    }
    loop {
        let draft = controller.draft().await;
        let Some(title) = read_line(lines, &format!("title [{}]: ", draft.title))? else {
            return Ok(Route::Exit);
        };
        if title == "discard" {
            return Ok(Route::Dashboard);
        }
        if !title.is_empty() {
            controller.set_title(title).await;
        }
        let Some(description) = read_line(lines, &format!("description [{}]: ", draft.description))?
        else {
            return Ok(Route::Exit);
        };
        if description == "discard" {
            return Ok(Route::Dashboard);
        }
        if !description.is_empty() {
            controller.set_description(description).await;
        }

        if let Some(NavIntent::ToDashboard) = controller.submit().await {
            return Ok(Route::Dashboard);
        }
        for (field, message) in controller.validation_errors().await {
            println!("{field}: {message}");
        }
    }
}
