use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use family_savings::{Contribution, create_contribution, initialize_db};

/// A utility for creating a test database for the family savings server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of contributions to create, counting back from today.
    #[arg(long, short, default_value_t = 365)]
    days: u16,
}

const MEMBERS: [&str; 5] = [
    "Opio Daniel",
    "Aryono Innocent",
    "Ekwang Oscar",
    "Ogwal Walter",
    "Aryono Jimmy",
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();
    let start_date = today - Duration::days(i64::from(args.days));

    println!("Creating contributions from {start_date} to {today}...");

    let mut count = 0;
    for date in weekly_dates(start_date, today) {
        for (index, name) in MEMBERS.iter().enumerate() {
            // Members take turns skipping a week so the totals vary.
            if (date.ordinal() as usize / 7 + index) % MEMBERS.len() == 0 {
                continue;
            }

            let amount = 5_000 * (index as i64 + 1);
            create_contribution(Contribution::build(name, amount, date), &conn)?;
            count += 1;
        }
    }

    println!("Created {count} contributions.");
    println!("Success!");

    Ok(())
}

/// Every seventh day from `start` up to and including `end`.
fn weekly_dates(start: Date, end: Date) -> impl Iterator<Item = Date> {
    std::iter::successors(Some(start), |date| date.checked_add(Duration::days(7)))
        .take_while(move |date| *date <= end)
}
