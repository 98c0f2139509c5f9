//! `guests` - CLI for guestlist
//!
//! This binary provides the command-line interface for managing an event's
//! guest list.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::{bail, Context};
use clap::Parser;

use guestlist::cli::{
    output, AddCommand, ClearCommand, Cli, Command, ConfigCommand, EditCommand, GuestArg,
    ListCommand, OutputFormat, RemoveCommand,
};
use guestlist::{init_logging, Config, Error, GuestStore, SqliteStore};

type Store = GuestStore<SqliteStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => handle_add(&config, &mut open_store(&config)?, &cmd),
        Command::List(cmd) => handle_list(&config, &open_store(&config)?, &cmd),
        Command::Confirm(arg) => handle_confirm(&mut open_store(&config)?, &arg),
        Command::Rsvp(arg) => handle_rsvp(&mut open_store(&config)?, &arg),
        Command::Edit(cmd) => handle_edit(&config, &mut open_store(&config)?, &cmd),
        Command::Remove(cmd) => handle_remove(&config, &mut open_store(&config)?, &cmd),
        Command::Clear(cmd) => handle_clear(&config, &mut open_store(&config)?, &cmd),
        Command::Summary(cmd) => handle_summary(&config, &open_store(&config)?, cmd.json),
        Command::Status(cmd) => handle_status(&config, &open_store(&config)?, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the guest list at the configured database path.
fn open_store(config: &Config) -> anyhow::Result<Store> {
    let database_path = config.database_path();
    let backend = SqliteStore::open(&database_path)
        .with_context(|| format!("cannot open guest list at {}", database_path.display()))?;
    Ok(GuestStore::open(backend, config.storage.key.clone()))
}

fn handle_add(config: &Config, store: &mut Store, cmd: &AddCommand) -> anyhow::Result<()> {
    match store.add(cmd.draft()) {
        Ok(guest) => {
            println!("Added guest:");
            println!("{}", output::guest_card(&guest, &config.display.date_format));
            Ok(())
        }
        Err(Error::Validation(errors)) => {
            eprintln!("{}", output::validation_text(&errors));
            bail!("guest was not added");
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_list(config: &Config, store: &Store, cmd: &ListCommand) -> anyhow::Result<()> {
    let mode = cmd.filter.map_or(config.display.default_filter, Into::into);
    let shown = store.visible(&cmd.search, mode);
    let date_format = &config.display.date_format;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Plain => {
            for guest in &shown {
                println!("{}", output::guest_line(guest, date_format));
            }
        }
        OutputFormat::Table => {
            if shown.is_empty() {
                println!("No guests found.");
                if store.is_empty() {
                    println!("Add your first guest with `guests add <name> <email>`.");
                } else {
                    println!("Try adjusting your search or filter.");
                }
            } else {
                println!("Guest List ({}): {}", shown.len(), output::match_count(shown.len()));
                println!();
                print!("{}", output::guest_table(&shown, date_format));
            }
        }
    }
    Ok(())
}

fn handle_confirm(store: &mut Store, arg: &GuestArg) -> anyhow::Result<()> {
    let id = store.resolve(&arg.id)?;
    if let Some(guest) = store.toggle_confirmed(&id) {
        let status = if guest.confirmed { "confirmed" } else { "pending" };
        println!("{} is now {status}.", guest.name);
    }
    Ok(())
}

fn handle_rsvp(store: &mut Store, arg: &GuestArg) -> anyhow::Result<()> {
    let id = store.resolve(&arg.id)?;
    if let Some(guest) = store.toggle_rsvp(&id) {
        let rsvp = if guest.rsvp { "yes" } else { "no" };
        println!("RSVP for {} is now {rsvp}.", guest.name);
    }
    Ok(())
}

fn handle_edit(config: &Config, store: &mut Store, cmd: &EditCommand) -> anyhow::Result<()> {
    let id = store.resolve(&cmd.id)?;
    let date_format = &config.display.date_format;
    let Some(current) = store.get(&id).cloned() else {
        bail!(Error::unknown_guest(&cmd.id));
    };

    if cmd.is_empty() {
        println!("{}", output::guest_card(&current, date_format));
        println!("Nothing to change. Pass --name, --email, --phone or --notes.");
        return Ok(());
    }

    store.set_editing(&id, true);
    match store.update(&id, cmd.patch(&current)) {
        Ok(Some(guest)) => {
            println!("Updated guest:");
            println!("{}", output::guest_card(&guest, date_format));
            Ok(())
        }
        Ok(None) => bail!(Error::unknown_guest(&cmd.id)),
        Err(Error::Validation(errors)) => {
            store.cancel_edit(&id);
            eprintln!("{}", output::validation_text(&errors));
            bail!("guest was not updated");
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_remove(config: &Config, store: &mut Store, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let id = store.resolve(&cmd.id)?;
    let name = store.get(&id).map(|g| g.name.clone()).unwrap_or_default();

    store.request_removal(&id);
    let confirmed = cmd.yes
        || !config.display.confirm_destructive
        || ask(&format!("Are you sure you want to remove {name}?"))?;

    if confirmed {
        store.confirm_removal(&id)?;
        println!("Removed {name}.");
    } else {
        store.cancel_removal();
        println!("Cancelled.");
    }
    Ok(())
}

fn handle_clear(config: &Config, store: &mut Store, cmd: &ClearCommand) -> anyhow::Result<()> {
    if store.is_empty() {
        println!("The guest list is already empty.");
        return Ok(());
    }

    store.request_clear();
    let confirmed = cmd.yes
        || !config.display.confirm_destructive
        || ask(&format!(
            "Are you sure you want to remove all {} guests? This action cannot be undone.",
            store.len()
        ))?;

    if confirmed {
        let removed = store.confirm_clear()?;
        println!("Removed {removed} guests.");
    } else {
        store.cancel_clear();
        println!("Cancelled.");
    }
    Ok(())
}

fn handle_summary(config: &Config, store: &Store, json: bool) -> anyhow::Result<()> {
    let summary = store.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!(
            "{}",
            output::summary_text(&summary, &config.display.date_format)
        );
    }
    Ok(())
}

fn handle_status(config: &Config, store: &Store, json: bool) -> anyhow::Result<()> {
    let stats = store.backend().stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": store.backend().path(),
            "storage_key": store.key(),
            "guests": store.len(),
            "stored_bytes": stats.value_bytes,
            "database_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("guests status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Storage key:   {}", store.key());
        println!("Guests:        {}", store.len());
        println!("Stored bytes:  {}", stats.value_bytes);
        println!("Database size: {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:       {}", config.database_path().display());
                println!("  Key:                 {}", config.storage.key);
                println!();
                println!("[Display]");
                println!("  Default filter:      {}", config.display.default_filter);
                println!("  Date format:         {}", config.display.date_format);
                println!(
                    "  Confirm destructive: {}",
                    config.display.confirm_destructive
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on the terminal. Anything but "y" or "yes" is no.
fn ask(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
