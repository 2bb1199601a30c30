// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn flag(name: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(name)
        .short(short)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn build_cli() -> Command {
    Command::new("mspgen")
        .version(env!("CARGO_PKG_VERSION"))
        .author("mspgen Contributors")
        .about("Generate an MSP patch from two MSI packages")
        .arg(
            Arg::new("old")
                .short('o')
                .long("old")
                .value_name("MSI")
                .required(true)
                .help("The path to the old MSI file"),
        )
        .arg(
            Arg::new("new")
                .short('n')
                .long("new")
                .value_name("MSI")
                .required(true)
                .help("The path to the new MSI file"),
        )
        .arg(
            Arg::new("pcp")
                .long("pcp")
                .value_name("PCP")
                .help("Patch control file template"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("MSP")
                .help("Where to write the MSP file"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Tool configuration file (TOML)"),
        )
        .arg(flag("sign", 's', "Whether the generated msp file should be signed"))
        .arg(flag("log", 'l', "Enable printing out the debug log output"))
        .arg(
            Arg::new("keep_staging")
                .long("keep-staging")
                .action(ArgAction::SetTrue)
                .help("Keep the staging directory after the run"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    if let Err(e) = fs::write(man_dir.join("mspgen.1"), buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
