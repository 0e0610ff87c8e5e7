use std::process::ExitCode;

use redquad::AppConfig;

fn main() -> ExitCode {
    env_logger::init();

    // Clean shutdown exits 0; a shader build failure is reported and maps
    // to a distinct failure code.
    match redquad::run(AppConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
