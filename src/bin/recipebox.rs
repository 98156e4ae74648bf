use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use recipebox::client::{
    ClientError, RecipeboxClient, SessionStore, DEFAULT_API_URL, DEFAULT_SESSION_FILE,
};
use recipebox::recipes::dto::SavedRecipe;

/// Terminal client for recipebox.
#[derive(Parser, Debug)]
#[command(name = "recipebox", version)]
struct Cli {
    /// API root, e.g. http://localhost:5000/api
    #[arg(long, env = "RECIPEBOX_API", default_value = DEFAULT_API_URL)]
    server: String,

    /// Where the login session is kept between runs.
    #[arg(long, env = "RECIPEBOX_SESSION", default_value = DEFAULT_SESSION_FILE)]
    session: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in, register, log out or show who is logged in.
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Search recipes by comma-separated ingredients.
    Ingredients { ingredients: String },
    /// Search recipes under a calorie limit.
    Calories { max_calories: f64 },
    /// List saved recipes, newest first.
    Saved,
    /// Show a recipe's source link.
    View {
        id: i64,
        /// Open the link in the default browser.
        #[arg(long)]
        open: bool,
    },
    /// Save a recipe to your list, as shown in the last search.
    Save { id: i64 },
}

#[derive(Subcommand, Debug)]
enum AccountAction {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(ClientError::NotLoggedIn) => {
            eprintln!("Please log in to continue:");
            eprintln!("  recipebox account login --username <name> --password <password>");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let mut client = RecipeboxClient::new(&cli.server, SessionStore::new(cli.session))?;

    match cli.command {
        Command::Account { action } => match action {
            AccountAction::Login { username, password } => {
                let session = client.login(&username, &password).await?;
                println!("Welcome, {}!", session.username);
            }
            AccountAction::Register {
                username,
                email,
                password,
            } => {
                let session = client.register(&username, &email, &password).await?;
                println!("Welcome, {}!", session.username);
            }
            AccountAction::Logout => {
                client.logout()?;
                println!("Logged out.");
            }
            AccountAction::Status => match client.session() {
                Some(_) => {
                    let me = client.me().await?;
                    println!("Logged in as {}", me.username);
                }
                None => return Err(ClientError::NotLoggedIn),
            },
        },
        Command::Ingredients { ingredients } => {
            print_cards(&client.search_by_ingredients(&ingredients).await?);
        }
        Command::Calories { max_calories } => {
            print_cards(&client.search_by_calories(max_calories).await?);
        }
        Command::Saved => {
            let saved = client.saved_recipes().await?;
            let username = client.session().map(|s| s.username.as_str()).unwrap_or("");
            print_saved(username, &saved);
        }
        Command::View { id, open } => {
            let detail = client.recipe_detail(id).await?;
            match detail.get("sourceUrl").and_then(Value::as_str) {
                Some(url) => {
                    println!("{}", url);
                    if open {
                        if let Err(e) = open_in_browser(url) {
                            eprintln!("Could not open a browser: {}", e);
                        }
                    }
                }
                None => println!("Recipe {} has no source link", id),
            }
        }
        Command::Save { id } => {
            println!("{}", client.save_by_id(id).await?);
        }
    }
    Ok(())
}

fn print_cards(results: &Value) {
    let Some(cards) = results.as_array() else {
        println!("{}", results);
        return;
    };
    if cards.is_empty() {
        println!("No recipes found");
        return;
    }
    for card in cards {
        let id = card.get("id").map(Value::to_string).unwrap_or_default();
        let title = card.get("title").and_then(Value::as_str).unwrap_or("(untitled)");
        println!("[{}] {}", id, title);
        if let Some(calories) = card.get("calories").filter(|c| !c.is_null()) {
            println!("    Calories: {}", calories);
        }
        if let Some(image) = card.get("image").and_then(Value::as_str) {
            println!("    {}", image);
        }
    }
    println!();
    println!("`recipebox view <id>` for the source, `recipebox save <id>` to keep it.");
}

fn print_saved(username: &str, saved: &[SavedRecipe]) {
    println!("{}'s Saved Recipes", username);
    if saved.is_empty() {
        println!("No recipes saved yet");
        return;
    }
    for recipe in saved {
        println!("[{}] {}", recipe.id, recipe.title);
        if let Some(calories) = recipe.calories {
            println!("    Calories: {}", calories);
        }
        if let Some(image) = &recipe.image {
            println!("    {}", image);
        }
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        std::process::Command::new("xdg-open")
    };
    cmd.arg(url).spawn()?;
    Ok(())
}
