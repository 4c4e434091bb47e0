//! Version command implementation.

pub fn cmd_version() -> Result<(), Box<dyn std::error::Error>> {
    println!("oxiwrap {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    Ok(())
}
