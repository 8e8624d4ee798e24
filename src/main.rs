//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves the demo page from `static/` on port 8000.

use std::io;
use std::process::{Command, ExitCode, Stdio};

const PORT: &str = "8000";

fn build_pkg() -> io::Result<bool> {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) => Ok(st.success()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("wasm-pack not found in PATH; serving whatever is in static/pkg");
            Ok(true)
        }
        Err(e) => Err(e),
    }
}

fn serve() -> io::Result<()> {
    println!("Serving demo at http://127.0.0.1:{PORT} …");
    let status = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .status()?;
    if !status.success() {
        eprintln!("http server exited with {status}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let result = build_pkg().and_then(|built| {
        if built {
            serve().map(|_| true)
        } else {
            eprintln!("wasm-pack build failed");
            Ok(false)
        }
    });

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("launcher failed: {e}");
            ExitCode::FAILURE
        }
    }
}
