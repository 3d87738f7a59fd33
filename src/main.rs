use anyhow::{bail, Context, Result};
use std::env;

use job_ledger::{Config, ErrorKind, Job, JobManager};

const USAGE: &str = "\
Usage: job-ledger <command> [args]

Commands:
  list                                          Show every job
  add    <name> <category> <rate> <date> <hours>
  remove <name> <category> <rate> <date> <hours>
  edit   <old: 5 fields> <new: 5 fields>
  category <category>                           Jobs in a category
  rate <rate>                                   Jobs at a rate
  day <name> <date>                             Jobs for a worker on a date
  cost <name>...                                Total cost per worker
  categories                                    Category counts per worker

Environment:
  JOB_LEDGER_CONFIG   JSON config file
  JOB_LEDGER_DATA     ledger CSV (overrides config)";

fn main() -> Result<()> {
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut manager = open_ledger(&config)?;

    match command.as_str() {
        "list" => {
            for job in manager.iter() {
                println!("{}  {}", &job.fingerprint()[..8], job);
            }
            println!("{}", manager);
        }
        "add" => {
            let job = parse_job(rest)?;
            manager.add_job(job.clone())?;
            save_ledger(&manager, &config)?;
            println!("✓ Added {}", job);
        }
        "remove" => {
            let job = parse_job(rest)?;
            let removed = manager.remove_job(&job)?;
            save_ledger(&manager, &config)?;
            println!("✓ Removed {}", removed);
        }
        "edit" => {
            if rest.len() != 10 {
                bail!("edit expects 10 arguments (old job, then new job)");
            }
            let old_job = parse_job(&rest[..5])?;
            let new_job = parse_job(&rest[5..])?;
            manager.edit_job(&old_job, new_job.clone())?;
            save_ledger(&manager, &config)?;
            println!("✓ Replaced {} with {}", old_job, new_job);
        }
        "category" => {
            let [category] = rest else {
                bail!("category expects 1 argument");
            };
            print_jobs(&manager.search_by_category(category));
        }
        "rate" => {
            let [rate] = rest else {
                bail!("rate expects 1 argument");
            };
            let rate: f64 = rate
                .parse()
                .with_context(|| format!("rate `{}` is not a number", rate))?;
            print_jobs(&manager.search_by_rate(rate));
        }
        "day" => {
            let [name, date] = rest else {
                bail!("day expects 2 arguments");
            };
            let jobs = manager.search_by_name_and_date(name, date);
            print_jobs(&jobs);
            println!(
                "{} of {} hours booked",
                manager.total_hours_for(name, date),
                manager.daily_limit()
            );
        }
        "cost" => {
            for (name, total) in manager.total_cost_per_name(rest) {
                println!("{}: {:.2}", name, total);
            }
        }
        "categories" => {
            for (name, categories) in manager.category_count_per_name() {
                println!("{}", name);
                for (category, count) in categories {
                    println!("  {}: {}", category, count);
                }
            }
        }
        other => {
            eprintln!("❌ Unknown command: {}\n", other);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Load the ledger named in config; a missing file is an empty ledger.
fn open_ledger(config: &Config) -> Result<JobManager> {
    let mut manager = JobManager::with_daily_limit(config.daily_hour_limit);

    match manager.load_from_file(&config.data_file) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::FileNotFound => {
            log::debug!("{} does not exist yet, starting empty", config.data_file.display());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load {}", config.data_file.display()))
        }
    }

    Ok(manager)
}

fn save_ledger(manager: &JobManager, config: &Config) -> Result<()> {
    manager
        .save_to_file(&config.data_file)
        .with_context(|| format!("Failed to save {}", config.data_file.display()))
}

fn parse_job(args: &[String]) -> Result<Job> {
    let [name, category, rate, date, hours] = args else {
        bail!("expected <name> <category> <rate> <date> <hours>");
    };

    let rate: f64 = rate
        .parse()
        .with_context(|| format!("rate `{}` is not a number", rate))?;
    let hours: i64 = hours
        .parse()
        .with_context(|| format!("hours `{}` is not an integer", hours))?;

    Ok(Job::new(name, category, rate, date, hours)?)
}

fn print_jobs(jobs: &[&Job]) {
    if jobs.is_empty() {
        println!("(no matching jobs)");
    }
    for job in jobs {
        println!("{}", job);
    }
}
