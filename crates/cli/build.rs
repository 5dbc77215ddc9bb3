use std::{env, fs, path::PathBuf};

fn input_arg() -> clap::Arg {
    clap::arg!(<INPUT> "Topic URL, local HTML file, or '-' for stdin")
}

fn url_arg() -> clap::Arg {
    clap::arg!(--url <URL> "Topic URL to record when reading from a file or stdin").value_name("URL")
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("replytree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read forum topics and their reply threads")
        .subcommand_required(true)
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").global(true).default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").global(true))
        .arg(
            clap::arg!(--rules <FILE> "Selector rules file (JSON)")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--width <NUM> "Wrap text output at this width (0 disables wrapping)")
                .global(true)
                .default_value("80"),
        )
        .arg(clap::arg!(--no_content "Omit topic bodies and reply contents from text output").global(true))
        .arg(clap::arg!(--pretty "Pretty-print JSON output").global(true))
        .arg(clap::arg!(--edges "Include reply graph edges in JSON topic output").global(true))
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("list")
                .about("List topics from a listing page")
                .arg(clap::arg!([INPUT] "Listing URL, local HTML file, or '-' for stdin")),
        )
        .subcommand(
            clap::Command::new("topic")
                .about("Show a topic with its replies and reply counts")
                .arg(input_arg())
                .arg(url_arg()),
        )
        .subcommand(
            clap::Command::new("replies")
                .about("Show the replies addressed to an author or to one reply")
                .arg(input_arg())
                .arg(clap::arg!(--to <AUTHOR> "Author whose mentions to collect"))
                .arg(clap::arg!(--reply <N> "Reply position (1-based) to use as the focus"))
                .arg(url_arg()),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "replytree", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "replytree", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "replytree", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "replytree", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
