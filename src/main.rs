//! gh-fetch: resolve GitHub references, clone repositories and fetch single files

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
