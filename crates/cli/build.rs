use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("bandbbs")
        .version(env!("CARGO_PKG_VERSION"))
        .author("BandBBS Client Contributors")
        .about("Scrape BandBBS forum pages into listings")
        .arg(
            clap::arg!([VIEW] "View to load (home, resources, discover, profile)")
                .default_value("home")
                .value_parser(["home", "resources", "discover", "profile"]),
        )
        .arg(clap::arg!(-i --input <FILE> "Read a saved page instead of fetching it, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(clap::arg!(--pretty "Pretty print JSON output"))
        .arg(clap::arg!(--header "Include the view name and page URL in output"))
        .arg(clap::arg!(--width <CHARS> "Clip long text fields to this many characters (0 = no limit)").default_value("0"))
        .arg(clap::arg!(--"base-url" <URL> "Forum root URL, overriding the site config").value_name("URL"))
        .arg(
            clap::arg!(--"config-dir" <DIR> "Custom site config directory")
                .value_name("DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "bandbbs", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "bandbbs", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "bandbbs", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "bandbbs", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
