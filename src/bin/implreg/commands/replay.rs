//! `implreg replay` command

use anyhow::Result;

use crate::cli::ReplayArgs;
use implreg::ops::{format_replay, replay, ReplayOptions};

pub fn execute(args: ReplayArgs) -> Result<()> {
    let config = super::load_config()?;

    let local_libraries = if args.local_libraries.is_empty() {
        config.replay.local_libraries
    } else {
        args.local_libraries
    };

    let opts = ReplayOptions {
        fragments: args.fragments,
        install_after: args.install_after.or(config.replay.install_after),
        local_libraries,
    };

    let report = replay(&opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_replay(&report));
    }

    Ok(())
}
