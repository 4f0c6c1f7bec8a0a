use clap::{crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand};
use pzz::{compress_file, decompress_file, list, patch, unpack};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let arg_archive = Arg::with_name("archive")
        .help("Archive file")
        .short("a")
        .long("archive")
        .required(true)
        .takes_value(true)
        .value_name("FILE");

    let arg_basedir = Arg::with_name("basedir")
        .help("Directory of extracted files (defaults to '.')")
        .required(true)
        .value_name("DIR")
        .default_value(".");

    let arg_input = Arg::with_name("input")
        .help("Input file")
        .required(true)
        .value_name("IN");

    let arg_output = Arg::with_name("output")
        .help("Output file")
        .required(true)
        .value_name("OUT");

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("list")
                .about("List archive entries")
                .arg(&arg_archive)
                .arg(
                    Arg::with_name("chunks")
                        .help("Show the chunk outline of each entry")
                        .long("chunks"),
                ),
        )
        .subcommand(
            SubCommand::with_name("unpack")
                .about("Extract entries and write a manifest")
                .arg(&arg_archive)
                .arg(&arg_basedir)
                .arg(
                    Arg::with_name("all")
                        .help("Also extract unrecognized entries")
                        .long("all"),
                ),
        )
        .subcommand(
            SubCommand::with_name("patch")
                .about("Write extracted entries back into the archive")
                .arg(&arg_archive)
                .arg(&arg_basedir)
                .arg(
                    Arg::with_name("force")
                        .help("Replace entries even if they are unchanged")
                        .short("f")
                        .long("force"),
                ),
        )
        .subcommand(
            SubCommand::with_name("compress")
                .about("Compress a raw file")
                .arg(&arg_input)
                .arg(&arg_output),
        )
        .subcommand(
            SubCommand::with_name("decompress")
                .about("Decompress a compressed entry")
                .arg(&arg_input)
                .arg(&arg_output),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("list") {
        list(
            matches.value_of("archive").unwrap(),
            matches.is_present("chunks"),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("unpack") {
        unpack(
            matches.value_of("archive").unwrap(),
            matches.value_of("basedir").unwrap(),
            matches.is_present("all"),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("patch") {
        patch(
            matches.value_of("archive").unwrap(),
            matches.value_of("basedir").unwrap(),
            matches.is_present("force"),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("compress") {
        compress_file(
            matches.value_of("input").unwrap(),
            matches.value_of("output").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("decompress") {
        decompress_file(
            matches.value_of("input").unwrap(),
            matches.value_of("output").unwrap(),
        )?;
    }

    Ok(())
}
