fn main() {
    env_logger::init();

    let command = match h8emu::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{:#}\n{}", err, h8emu::usage());
            std::process::exit(2);
        }
    };

    if let Err(err) = h8emu::run(command) {
        log::error!("{:#}", err);
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
