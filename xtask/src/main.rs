use std::env;

use xshell::cmd;

type DynError = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, DynError>;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("{}", e);
        std::process::exit(-1);
    }
}

fn try_main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("ci") => ci()?,
        Some("check_fmt") => check_fmt()?,
        Some("build") => build()?,
        Some("clippy") => clippy()?,
        Some("test") => test()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        "Tasks:
ci              Runs CI locally.
check_fmt       Checks formatting.
build           Builds the robot library.
clippy          Lints the robot library.
test            Runs the unit tests against the simulated platform.
"
    )
}

fn ci() -> Result<()> {
    check_fmt()?;
    build()?;
    clippy()?;
    test()?;

    eprintln!("Done!");

    Ok(())
}

fn check_fmt() -> Result<()> {
    eprintln!("Checking formatting...");
    cmd!("cargo fmt -- --check").run()?;
    Ok(())
}

fn build() -> Result<()> {
    eprintln!("Building library...");
    cmd!("cargo build -p flywheel-bot")
        .env("RUSTFLAGS", "-D warnings")
        .run()?;

    eprintln!("Building without logging...");
    cmd!("cargo build -p flywheel-bot --no-default-features")
        .env("RUSTFLAGS", "-D warnings")
        .run()?;

    Ok(())
}

fn clippy() -> Result<()> {
    eprintln!("Linting library...");
    cmd!("cargo clippy -p flywheel-bot --all-targets -- -D warnings").run()?;

    Ok(())
}

fn test() -> Result<()> {
    eprintln!("Running tests...");
    cmd!("cargo test -p flywheel-bot").run()?;

    Ok(())
}
