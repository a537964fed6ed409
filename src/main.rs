use clap::{Parser, Subcommand};
use code_parallel::commands::{
    AddCommand, ApiSetCommand, ClearCommand, Command, ContextClearCommand, ContextSetCommand,
    ContextShowCommand, ListCommand, RunCommand,
};
use code_parallel::context::AppContext;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "code-parallel")]
#[command(author, version, about = "Queue code generation tasks and run them in parallel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task to the queue, or manage the queue
    #[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
    Queue {
        /// Task as a JSON array: '["description", "output1", ..., "deep"]'
        task_json: Option<String>,

        #[command(subcommand)]
        action: Option<QueueAction>,
    },
    /// Manage the generation service API key
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
    /// Manage the project context sent with every task
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },
}

#[derive(Subcommand)]
enum QueueAction {
    /// Execute every queued task
    Run {
        /// Number of parallel workers (defaults to run.default_workers, 10)
        #[arg(short, long)]
        parallel: Option<usize>,
    },
    /// List queued tasks
    List,
    /// Remove every queued task
    Clear,
}

#[derive(Subcommand)]
enum ApiAction {
    /// Store the API key
    Set { key: String },
}

#[derive(Subcommand)]
enum ContextAction {
    /// Set the project context
    Set { text: String },
    /// Show the project context
    Show,
    /// Clear the project context
    Clear,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CODE_PARALLEL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let command: Box<dyn Command> = match cli.command {
        Commands::Queue { task_json, action } => match (task_json, action) {
            (_, Some(QueueAction::Run { parallel })) => Box::new(RunCommand { parallel }),
            (_, Some(QueueAction::List)) => Box::new(ListCommand),
            (_, Some(QueueAction::Clear)) => Box::new(ClearCommand),
            (Some(task_json), None) => Box::new(AddCommand { task_json }),
            (None, None) => {
                eprintln!("Error: provide a task JSON array or one of run, list, clear");
                std::process::exit(2);
            }
        },
        Commands::Api {
            action: ApiAction::Set { key },
        } => Box::new(ApiSetCommand { key }),
        Commands::Context { action } => match action {
            ContextAction::Set { text } => Box::new(ContextSetCommand { text }),
            ContextAction::Show => Box::new(ContextShowCommand),
            ContextAction::Clear => Box::new(ContextClearCommand),
        },
    };

    let ctx = match AppContext::builder().build() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = command.execute(&ctx).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
