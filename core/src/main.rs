mod cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = cli::run(&args) {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}
