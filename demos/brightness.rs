use std::env::args;
use anyhow::{bail, Context};
use monitorctl_ddc::{Ddc, LinuxTransport, Report, Target};

fn setup_logs() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn print_report<T>(report: &Report<T>, describe: impl Fn(&T) -> String) {
    for outcome in report {
        match outcome.result {
            Ok(ref value) => println!("I2C bus {}: {}", outcome.bus, describe(value)),
            Err(ref e) => println!("I2C bus {}: failed ({:?}): {}", outcome.bus, e.kind(), e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    setup_logs();

    let ddc = Ddc::new(LinuxTransport);
    let mut target = ddc.default_target();
    let mut get = false;
    let mut value = None;

    let mut args = args().skip(1);
    while let Some(arg) = args.next() {
        match &arg[..] {
            "-a" | "--all" => target = Target::All,
            "-g" | "--get" => get = true,
            "-b" | "--bus" => {
                let bus = args.next().context("argument: --bus requires a bus number")?;
                target = Target::Bus(bus.parse().with_context(|| format!("invalid bus number {:?}", bus))?);
            },
            v => value = Some(v.parse::<u8>().with_context(|| format!("invalid brightness {:?}", v))?),
        }
    }

    let total_failure = if get {
        let report = ddc.get(target)?;
        print_report(&report, |value| format!("brightness is {}", value));
        report.is_total_failure()
    } else {
        let value = match value {
            Some(value) => value,
            None => bail!("usage: brightness [--all] [--bus N] [--get | VALUE]"),
        };
        let report = ddc.set(target, value)?;
        print_report(&report, |_| format!("brightness set to {}", value));
        report.is_total_failure()
    };

    if total_failure {
        bail!("no display accepted the command")
    }

    Ok(())
}
