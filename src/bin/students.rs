use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use student_records::{
    client::{
        form::{Field, FormState, Submission},
        list::{mount, ListScreen},
        session::{FileSessionStore, Route, SessionGate},
        view, HttpRecordsApi, Notice, RecordsApi,
    },
    config::ClientConfig,
    logging,
};

#[derive(Parser, Debug)]
#[command(name = "students")]
#[command(about = "Manage student records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with any non-empty username and password
    Login {
        #[arg(default_value = "")]
        username: String,
        #[arg(default_value = "")]
        password: String,
    },
    /// Log out
    Logout,
    /// List students
    #[command(alias = "ls")]
    List {
        /// Filter by name (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,
        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Add a student
    Add(FieldArgs),
    /// Edit a student; omitted fields keep their current value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a student
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct FieldArgs {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// YYYY-MM-DD
    #[arg(long = "dob")]
    date_of_birth: Option<String>,
    #[arg(long = "course")]
    course_name: Option<String>,
    /// Active or Inactive
    #[arg(long)]
    status: Option<String>,
}

impl FieldArgs {
    fn apply(self, state: &mut FormState) -> anyhow::Result<()> {
        let pairs = [
            (Field::FullName, self.full_name),
            (Field::Email, self.email),
            (Field::Phone, self.phone),
            (Field::DateOfBirth, self.date_of_birth),
            (Field::CourseName, self.course_name),
            (Field::Status, self.status),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                state.set(field, &value)?;
            }
        }
        Ok(())
    }
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::List { .. } | Command::Delete { .. } => Route::Students,
            Command::Add(_) => Route::Add,
            Command::Edit { id, .. } => Route::Edit(*id),
        }
    }
}

fn report(notice: Notice) -> anyhow::Result<()> {
    if notice.is_error() {
        bail!(notice.message);
    }
    println!("{notice}");
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

async fn submit(mut state: FormState, api: &dyn RecordsApi) -> anyhow::Result<()> {
    match state.submit(api).await {
        Submission::Saved(notice) | Submission::Failed(notice) => report(notice),
        Submission::Invalid => {
            eprint!("{}", view::render_form(&state));
            bail!("please fix the fields marked above");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let mut gate = SessionGate::init(FileSessionStore::new(config.session_file.clone()));

    let route = cli.command.route();
    if route != Route::Login && gate.guard(route) == Route::Login {
        eprintln!("{}", view::render_login_hint());
        bail!("not logged in; run `students login <username> <password>`");
    }

    let api = HttpRecordsApi::new(&config.api_url).context("build http client")?;

    match cli.command {
        Command::Login { username, password } => {
            let notice = gate.login(&username, &password)?;
            report(notice)
        }
        Command::Logout => report(gate.logout()?),
        Command::List { search, page } => match mount(&api).await {
            ListScreen::Failed(notice) => report(notice),
            ListScreen::Ready(mut list) => {
                list.set_search(&search);
                list.go_to(page);
                print!("{}", view::render_list(&list, gate.username()));
                Ok(())
            }
        },
        Command::Add(fields) => {
            let mut state = FormState::create();
            fields.apply(&mut state)?;
            submit(state, &api).await
        }
        Command::Edit { id, fields } => {
            let mut state = match FormState::load_edit(&api, id).await {
                Ok(state) => state,
                Err(notice) => return report(notice),
            };
            fields.apply(&mut state)?;
            submit(state, &api).await
        }
        Command::Delete { id, yes } => {
            let mut list = match mount(&api).await {
                ListScreen::Ready(list) => list,
                ListScreen::Failed(notice) => return report(notice),
            };
            if !yes && !confirm("Are you sure you want to delete this student?")? {
                return Ok(());
            }
            report(list.delete(&api, id).await)?;
            print!("{}", view::render_list(&list, gate.username()));
            Ok(())
        }
    }
}
