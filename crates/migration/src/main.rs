use sea_orm::Database;
use sea_orm_migration::prelude::*;

enum Command {
    Up,
    Down(u32),
    Fresh,
    Status,
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let verb = args.next().unwrap_or_else(|| "up".to_string());

    match verb.as_str() {
        "up" => Ok(Command::Up),
        "down" => match args.next() {
            None => Ok(Command::Down(1)),
            Some(steps) => steps
                .parse()
                .map(Command::Down)
                .map_err(|_| format!("not a step count: {steps}")),
        },
        "fresh" => Ok(Command::Fresh),
        "status" => Ok(Command::Status),
        other => Err(format!("unknown command: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = match parse_command(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(reason) => {
            eprintln!("{reason}");
            eprintln!("usage: migration [up | down [steps] | fresh | status]");
            std::process::exit(2);
        }
    };

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./shopone.db?mode=rwc".to_string());
    let db = Database::connect(&db_url).await?;

    match command {
        Command::Up => migration::Migrator::up(&db, None).await?,
        Command::Down(steps) => migration::Migrator::down(&db, Some(steps)).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
