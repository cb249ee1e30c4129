//! attendsync main entrypoint.

use attendsync::run;
use attendsync::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
