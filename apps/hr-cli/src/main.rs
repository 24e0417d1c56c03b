use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{
    CrudRepository, Employee, EmployeeRepository, NameParams, SeaEmployeeRepository,
};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hr", version, about = "HR employee store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    #[command(flatten)]
    Employee(EmployeeCommand),
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    /// Store a new employee.
    Add(AddCommand),
    /// Fetch an employee by id.
    Get { id: i64 },
    /// List every employee.
    List,
    /// Look an employee up by email address.
    FindEmail { email: String },
    /// Look an employee up by first and last name.
    FindName(FindNameCommand),
    /// Change fields of a stored employee.
    Update(UpdateCommand),
    /// Remove an employee by id.
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct AddCommand {
    #[arg(long)]
    first: String,
    #[arg(long)]
    last: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct FindNameCommand {
    first: String,
    last: String,
    #[arg(long, value_enum, default_value_t = Dialect::Entity)]
    dialect: Dialect,
    #[arg(long, value_enum, default_value_t = Binding::Positional)]
    binding: Binding,
}

#[derive(Args, Debug)]
struct UpdateCommand {
    id: i64,
    #[arg(long)]
    first: Option<String>,
    #[arg(long)]
    last: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Dialect {
    Entity,
    Native,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Binding {
    Positional,
    Named,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing(ObsConfig::named("hr-cli"))?;
    let cli = Cli::parse();
    let pool = setup_pool().await?;
    match cli.command {
        Command::Migrate(action) => {
            migrate(&pool, action).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Employee(command) => {
            let repo = SeaEmployeeRepository::new(Arc::new(pool));
            run(&repo, command).await
        }
    }
}

async fn migrate(pool: &DbPool, action: MigrateCommand) -> Result<()> {
    match action {
        MigrateCommand::Up => {
            Migrator::up(pool, None).await?;
            info!("database migrations applied");
        }
        MigrateCommand::Down => {
            Migrator::down(pool, Some(1)).await?;
            info!("most recent migration rolled back");
        }
    }
    Ok(())
}

async fn setup_pool() -> Result<DbPool> {
    let settings = DatabaseSettings::from_env()?;
    connect(&settings)
        .await
        .with_context(|| format!("connecting via ${}", settings.env_key()))
}

async fn run<R>(repo: &R, command: EmployeeCommand) -> Result<ExitCode>
where
    R: EmployeeRepository,
{
    match command {
        EmployeeCommand::Add(cmd) => {
            let employee = Employee::builder()
                .first_name(cmd.first)
                .last_name(cmd.last)
                .email(cmd.email)
                .build()?;
            print_json(&repo.save(employee).await?)
        }
        EmployeeCommand::Get { id } => print_found(repo.find_by_id(id).await?),
        EmployeeCommand::List => print_json(&repo.find_all().await?),
        EmployeeCommand::FindEmail { email } => print_found(repo.find_by_email(&email).await?),
        EmployeeCommand::FindName(cmd) => print_found(find_by_name(repo, &cmd).await?),
        EmployeeCommand::Update(cmd) => {
            let Some(mut employee) = repo.find_by_id(cmd.id).await? else {
                return print_found(None);
            };
            if let Some(first) = cmd.first {
                employee.set_first_name(first);
            }
            if let Some(last) = cmd.last {
                employee.set_last_name(last);
            }
            if let Some(email) = cmd.email {
                employee.set_email(email);
            }
            print_json(&repo.save(employee).await?)
        }
        EmployeeCommand::Delete { id } => {
            if !repo.exists_by_id(id).await? {
                return print_found(None);
            }
            repo.delete_by_id(id).await?;
            info!(id, "employee deleted");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn find_by_name<R>(repo: &R, cmd: &FindNameCommand) -> Result<Option<Employee>>
where
    R: EmployeeRepository,
{
    let params = NameParams::new(cmd.first.as_str(), cmd.last.as_str());
    let found = match (cmd.dialect, cmd.binding) {
        (Dialect::Entity, Binding::Positional) => {
            repo.find_by_entity_query(&cmd.first, &cmd.last).await?
        }
        (Dialect::Entity, Binding::Named) => repo.find_by_entity_query_named(&params).await?,
        (Dialect::Native, Binding::Positional) => {
            repo.find_by_native_sql(&cmd.first, &cmd.last).await?
        }
        (Dialect::Native, Binding::Named) => repo.find_by_native_sql_named(&params).await?,
    };
    Ok(found)
}

fn print_found(found: Option<Employee>) -> Result<ExitCode> {
    let code = if found.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };
    print_json(&found)?;
    Ok(code)
}

fn print_json<T: Serialize>(value: &T) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn find_name_defaults_to_entity_positional() {
        let cli = Cli::try_parse_from(["hr", "find-name", "Ali", "karaca"]).unwrap();
        let Command::Employee(EmployeeCommand::FindName(cmd)) = cli.command else {
            panic!("expected find-name");
        };
        assert_eq!(cmd.dialect, Dialect::Entity);
        assert_eq!(cmd.binding, Binding::Positional);
    }

    #[test]
    fn find_name_accepts_native_named() {
        let cli = Cli::try_parse_from([
            "hr",
            "find-name",
            "Ali",
            "karaca",
            "--dialect",
            "native",
            "--binding",
            "named",
        ])
        .unwrap();
        let Command::Employee(EmployeeCommand::FindName(cmd)) = cli.command else {
            panic!("expected find-name");
        };
        assert_eq!(cmd.dialect, Dialect::Native);
        assert_eq!(cmd.binding, Binding::Named);
    }

    #[test]
    fn add_requires_every_field() {
        assert!(Cli::try_parse_from(["hr", "add", "--first", "Ali", "--last", "karaca"]).is_err());
    }

    #[test]
    fn migrate_takes_a_direction() {
        let cli = Cli::try_parse_from(["hr", "migrate", "down"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(MigrateCommand::Down)));
    }

    async fn repository() -> SeaEmployeeRepository {
        let db = platform_db::connect_ephemeral().await.unwrap();
        SeaEmployeeRepository::new(Arc::new(db))
    }

    fn add_ali() -> EmployeeCommand {
        EmployeeCommand::Add(AddCommand {
            first: "Ali".into(),
            last: "karaca".into(),
            email: "alik@gmail.com".into(),
        })
    }

    #[tokio::test]
    async fn add_then_get_succeeds() {
        let repo = repository().await;

        let code = run(&repo, add_ali()).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let id = repo.find_all().await.unwrap()[0].id().unwrap();
        let code = run(&repo, EmployeeCommand::Get { id }).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn unknown_id_exits_with_failure() {
        let repo = repository().await;
        run(&repo, add_ali()).await.unwrap();

        let get = run(&repo, EmployeeCommand::Get { id: 404 }).await.unwrap();
        let delete = run(&repo, EmployeeCommand::Delete { id: 404 }).await.unwrap();
        let update = run(
            &repo,
            EmployeeCommand::Update(UpdateCommand {
                id: 404,
                first: Some("Veli".into()),
                last: None,
                email: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(get, ExitCode::FAILURE);
        assert_eq!(delete, ExitCode::FAILURE);
        assert_eq!(update, ExitCode::FAILURE);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_of_stored_employee_succeed() {
        let repo = repository().await;
        run(&repo, add_ali()).await.unwrap();
        let id = repo.find_all().await.unwrap()[0].id().unwrap();

        let update = run(
            &repo,
            EmployeeCommand::Update(UpdateCommand {
                id,
                first: None,
                last: None,
                email: Some("ram@gmail.com".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(update, ExitCode::SUCCESS);
        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.email(), "ram@gmail.com");
        assert_eq!(stored.first_name(), "Ali");

        let delete = run(&repo, EmployeeCommand::Delete { id }).await.unwrap();
        assert_eq!(delete, ExitCode::SUCCESS);
        assert!(!repo.exists_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn find_name_miss_exits_with_failure() {
        let repo = repository().await;
        run(&repo, add_ali()).await.unwrap();

        for (dialect, binding) in [
            (Dialect::Entity, Binding::Positional),
            (Dialect::Native, Binding::Named),
        ] {
            let hit = EmployeeCommand::FindName(FindNameCommand {
                first: "Ali".into(),
                last: "karaca".into(),
                dialect,
                binding,
            });
            assert_eq!(run(&repo, hit).await.unwrap(), ExitCode::SUCCESS);

            let miss = EmployeeCommand::FindName(FindNameCommand {
                first: "John".into(),
                last: "Cena".into(),
                dialect,
                binding,
            });
            assert_eq!(run(&repo, miss).await.unwrap(), ExitCode::FAILURE);
        }
    }
}
