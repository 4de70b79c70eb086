use clap::Parser;
use passvault::cli::commands;
use passvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            ref username,
            generate,
        } => commands::init::execute(&cli, username, generate),
        Commands::Add {
            ref username,
            ref label,
            ref value,
            generate,
        } => commands::add::execute(&cli, username, label, value.as_deref(), generate),
        Commands::List { ref username } => commands::list::execute(&cli, username),
        Commands::Update {
            ref username,
            ref label,
            ref value,
            generate,
        } => commands::update::execute(&cli, username, label, value.as_deref(), generate),
        Commands::Delete {
            ref username,
            ref label,
            force,
        } => commands::delete::execute(&cli, username, label, force),
        Commands::Import { ref file } => commands::import_cmd::execute(&cli, file),
        Commands::Export {
            ref username,
            ref output,
            force,
        } => commands::export::execute(&cli, username, output.as_deref(), force),
        Commands::Generate => commands::generate::execute(),
        Commands::Recover { ref username } => commands::recover::execute(&cli, username),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
