use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("xferwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch a file transfer server until the current transfer finishes")
        .long_about("xferwatch polls a transfer server's status resource while a transfer is in progress. When the server reports the transfer as finished it waits briefly and prints the final status; if the status resource becomes unreachable it stops polling.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("status")
                .about("Fetch the transfer status once and print it")
                .arg(url_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("clear")
                .about("Reset the server's transfer status, then print it")
                .arg(url_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll the transfer status until the transfer finishes")
                .arg(url_arg())
                .arg(
                    Arg::new("interval-ms")
                        .long("interval-ms")
                        .help("Milliseconds between status checks (overrides config, default: 2000)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("reload-delay-ms")
                        .long("reload-delay-ms")
                        .help("Milliseconds to wait after completion before reloading (overrides config, default: 1000)")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("assume-active")
                        .long("assume-active")
                        .help("Start polling without checking first whether a transfer is running")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
}

fn url_arg() -> Arg {
    Arg::new("url")
        .long("url")
        .short('u')
        .help("Base URL of the transfer server (overrides config, default: http://localhost:5000)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}
