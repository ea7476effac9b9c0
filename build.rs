use std::process::Command;
use std::str::from_utf8;

const GIT_COMMAND: &str = "git";
const GIT_ARGS: [&str; 3] = ["show", "--no-patch", "--format=%h %as"];

const DEFAULT_HASH: &str = "0000000";
const DEFAULT_DATE: &str = "0000-00-00";

fn main() {
    let (hash, date) = git_version().unwrap_or_else(|| {
        (DEFAULT_HASH.to_string(), DEFAULT_DATE.to_string())
    });
    println!("cargo:rustc-env=VITRINE_BUILD_HASH={hash}");
    println!("cargo:rustc-env=VITRINE_BUILD_DATE={date}");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

/// Returns the abbreviated hash and date of the current commit, or `None` if either
/// `git` is unavailable or the working tree is not a repository.
fn git_version() -> Option<(String, String)> {
    let out = match Command::new(GIT_COMMAND).args(GIT_ARGS).output() {
        Ok(out) if out.status.success() => out,
        Ok(out) => {
            eprintln!("[{}]: {}", format_command(), out.status);
            return None;
        }
        Err(e) => {
            eprintln!("[{}]: {}", format_command(), e);
            return None;
        }
    };
    match from_utf8(&out.stdout) {
        Ok(s) => s
            .trim()
            .split_once(' ')
            .map(|(hash, date)| (hash.to_string(), date.to_string())),
        Err(e) => {
            eprintln!("error parsing UTF-8 output: {e}");
            None
        }
    }
}

fn format_command() -> String {
    let mut cmd = GIT_COMMAND.to_string();
    for arg in GIT_ARGS {
        cmd.push(' ');
        cmd.push_str(arg);
    }
    cmd
}
