use anyhow::Context;

use crate::pkg::manifest::Manifest;
use crate::pkg::update;

/// Exit code for any failure surfaced to the top level.
const EXIT_FAILURE: i32 = 64;

pub fn run_cli<I>(args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let target = args.next();
    if let Some(extra) = args.next() {
        eprintln!("unknown argument: {}", extra);
        return EXIT_FAILURE;
    }
    if target.as_deref() == Some("--help") {
        print_usage();
        return 0;
    }
    match run(target) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{:#}", err);
            EXIT_FAILURE
        }
    }
}

fn run(target: Option<String>) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("determine working directory")?;
    let root_manifest = Manifest::load(&cwd.join("package.json"))?;
    match target {
        Some(path) => update::update_single_package(&cwd, &root_manifest, &cwd.join(path)),
        None => update::update_all_packages(&cwd, &root_manifest),
    }
}

fn print_usage() {
    println!();
    println!("usage: depsync [packagepath]");
    println!();
    println!("update dependency lists for all packages under ./packages/node_modules");
    println!("\tdepsync");
    println!();
    println!("update dependency list for a single package");
    println!("\tdepsync ./packages/node_modules/sdk-core");
    println!();
}
