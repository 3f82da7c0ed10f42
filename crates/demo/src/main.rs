use std::cell::Cell;
use std::env;
use std::io;

use anyhow::Result;
use optsend::{Action, Parser, bind, help};
use tracing_subscriber::{EnvFilter, fmt};

/// The value bound to `--bird`, accepting whichever type the raw text
/// parses as first.
#[derive(Debug, PartialEq)]
enum Bird {
    Letter(char),
    Count(i64),
    Seed(f64),
    Name(String),
}

impl Bird {
    fn kind(&self) -> &'static str {
        match self {
            Bird::Letter(_) => "char",
            Bird::Count(_) => "i64",
            Bird::Seed(_) => "f64",
            Bird::Name(_) => "string",
        }
    }
}

impl std::fmt::Display for Bird {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bird::Letter(c) => write!(f, "{c}"),
            Bird::Count(n) => write!(f, "{n}"),
            Bird::Seed(x) => write!(f, "{x}"),
            Bird::Name(s) => write!(f, "{s}"),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let noises = Cell::new(0u32);
    let mut ducks = 0i64;
    let mut snack: Option<String> = None;
    let mut bird = Bird::Count(0);

    let stopped = {
        let mut parser = Parser::new();
        parser
            .on_positional(|value| {
                println!("something random: {value}");
                Ok(())
            })?
            .add("--help", "Show this help", help::show(io::stdout()))?
            .add(
                "--version",
                "Show version information",
                help::version(
                    io::stdout(),
                    concat!("optsend-demo ", env!("CARGO_PKG_VERSION")),
                ),
            )?
            .add(
                "-d,--dog",
                "What does the dog say?",
                Action::value(|_, value| {
                    println!("the dog goes \"{value}\"");
                    noises.set(noises.get() + 1);
                    Ok(())
                }),
            )?
            .add(
                "-c,--cat",
                "What does the cat say?",
                Action::optional(|_, value| {
                    println!("the cat goes \"{}\"", value.unwrap_or("???"));
                    noises.set(noises.get() + 1);
                    Ok(())
                }),
            )?
            .add(
                "-s,--snail",
                "Do snails say things?",
                Action::no_value(|_| {
                    println!("the snail doesn't say anything");
                    noises.set(noises.get() + 1);
                    Ok(())
                }),
            )?
            .add("-q,--duck", "Duck qty", bind::store(&mut ducks))?
            .add("-n,--snack", "Snack of choice", bind::store_opt(&mut snack))?
            .add(
                "-p",
                "Display information",
                Action::value(|_, topic| {
                    match topic {
                        "noises" => println!("{} animal noises so far", noises.get()),
                        other => println!("no information about '{other}'"),
                    }
                    Ok(())
                }),
            )?
            .add(
                "-b,--bird",
                "Birdseed qty",
                bind::one_of(&mut bird)
                    .or(Bird::Letter)
                    .or(Bird::Count)
                    .or(Bird::Seed)
                    .or(Bird::Name),
            )?;

        tracing::debug!("scanning and dispatching the command line");
        parser.parse(env::args())?.send()?;
        parser.stopped()
    };

    // Help and version have already written their output.
    if stopped {
        return Ok(());
    }

    if ducks != 0 {
        println!("{ducks} ducks");
    }
    if let Some(snack) = &snack {
        println!("snack of choice: {snack}");
    }
    if bird != Bird::Count(0) {
        println!("bird (of type '{}'): {}", bird.kind(), bird);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
