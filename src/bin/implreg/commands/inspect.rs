//! `implreg inspect` command

use anyhow::{bail, Result};

use crate::cli::InspectArgs;
use implreg::ops::{format_report, inspect, TrailerStatus};

pub fn execute(args: InspectArgs) -> Result<()> {
    let reports = args
        .paths
        .iter()
        .map(|path| inspect(path))
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", format_report(report));
        }
    }

    if args.check {
        let bad = reports
            .iter()
            .filter(|r| r.trailer != TrailerStatus::Consistent)
            .count();
        if bad > 0 {
            bail!("{} fragment(s) have a missing or stale offset trailer", bad);
        }
    }

    Ok(())
}
