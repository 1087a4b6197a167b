use std::env;

use crate::data::registry::DataRegistry;
use crate::data::validate::validate_dataset;
use crate::query;
use crate::server::{self, ServerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Validate,
    Snapshot,
    Series,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("validate") => Some(Command::Validate),
        Some("snapshot") => Some(Command::Snapshot),
        Some("series") => Some(Command::Series),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Validate) => handle_validate(),
        Some(Command::Snapshot) => handle_snapshot(args),
        Some(Command::Series) => handle_series(args),
        None => {
            eprintln!("usage: boletim <serve|validate|snapshot|series>");
            2
        }
    }
}

fn load_registry() -> Option<std::sync::Arc<DataRegistry>> {
    match DataRegistry::load() {
        Ok(registry) => Some(registry),
        Err(err) => {
            eprintln!("data load error: {err}");
            None
        }
    }
}

fn handle_serve() -> i32 {
    let Some(registry) = load_registry() else { return 1 };
    let bind_addr = env::var("BOLETIM_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let state = ServerState::new(registry);
    match server::run_server(&bind_addr, &state) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_validate() -> i32 {
    let Some(registry) = load_registry() else { return 1 };
    let report = validate_dataset(registry.national(), registry.regional());
    for diagnostic in &report.diagnostics {
        println!(
            "[{}] {}: {}",
            diagnostic.severity, diagnostic.context, diagnostic.message
        );
    }
    if report.has_errors() {
        eprintln!("dataset validation failed");
        1
    } else {
        println!(
            "dataset ok: {} national records, {} regional records",
            registry.national().len(),
            registry.regional().len()
        );
        0
    }
}

/// `boletim snapshot <location> <date>`: print the six counters.
fn handle_snapshot(args: &[String]) -> i32 {
    let (Some(location), Some(date)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: boletim snapshot <location> <date>");
        return 2;
    };
    let Some(registry) = load_registry() else { return 1 };
    match query::snapshot(&registry, location, date) {
        Ok(counters) => {
            println!("{} em {}", counters.location, counters.date);
            println!("  Casos recuperados:        {}", counters.new_recovered);
            println!("  Em acompanhamento:        {}", counters.active_monitoring);
            println!("  Casos confirmados totais: {}", counters.cumulative_cases);
            println!("  Novos casos na data:      {}", counters.new_cases);
            println!("  Óbitos confirmados:       {}", counters.cumulative_deaths);
            println!("  Óbitos na data:           {}", counters.new_deaths);
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// `boletim series <location> <metric>`: print the per-date values.
fn handle_series(args: &[String]) -> i32 {
    let (Some(location), Some(metric)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: boletim series <location> <metric>");
        return 2;
    };
    let Some(registry) = load_registry() else { return 1 };
    let metric = match query::parse_metric(metric) {
        Ok(metric) => metric,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    match query::line_series(&registry, location, metric) {
        Ok(points) => {
            for point in points {
                match point.value {
                    Some(value) => println!("{} {}", point.date, value),
                    None => println!("{} -", point.date),
                }
            }
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
