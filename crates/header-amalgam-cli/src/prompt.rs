use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

/// Ask whether an existing file may be overwritten; only `y` or `Y` agrees
pub fn confirm_overwrite<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(
        output,
        "File '{}' already exists. Overwrite it? (y/N) ",
        path.display()
    )?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    let response = response.trim();
    debug!("Response was '{}'", response);

    Ok(response.eq_ignore_ascii_case("y"))
}
