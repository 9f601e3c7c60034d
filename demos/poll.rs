//! Polls a MAX31856 twice a second, printing the thermocouple and cold-junction temperatures.
//!
//! Usage: `cargo run --example poll -- /dev/spidev0.0 [K|J|T|...] [F]`

use std::time::Duration;

use anyhow::{bail, Context};
use linux_max31856::{Config, Max31856, Max31856Error, ThermocoupleType, Unit};

fn thermocouple_type(name: &str) -> anyhow::Result<ThermocoupleType> {
    Ok(match name.to_ascii_uppercase().as_str() {
        "B" => ThermocoupleType::B,
        "E" => ThermocoupleType::E,
        "J" => ThermocoupleType::J,
        "K" => ThermocoupleType::K,
        "N" => ThermocoupleType::N,
        "R" => ThermocoupleType::R,
        "S" => ThermocoupleType::S,
        "T" => ThermocoupleType::T,
        other => bail!("unknown thermocouple type `{other}`"),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/spidev0.0".to_owned());
    let tc_type = thermocouple_type(&args.next().unwrap_or_else(|| "K".to_owned()))?;
    let unit = match args.next().as_deref() {
        Some("F") | Some("f") => Unit::Fahrenheit,
        _ => Unit::Celsius,
    };

    let mut max = Max31856::open(&path).with_context(|| format!("opening {path}"))?;
    max.configure(&Config::continuous(tc_type))?;

    loop {
        match (max.read_thermocouple(unit), max.read_cold_junction(unit)) {
            (Ok(tc), Ok(cj)) => println!("thermocouple {tc:8.3}°  junction {cj:7.3}°"),
            (Err(Max31856Error::NoDevice), _) | (_, Err(Max31856Error::NoDevice)) => {
                println!("no MAX31856 on {path}")
            }
            (Err(e), _) | (_, Err(e)) => println!("fault: {e}"),
        }
        std::thread::sleep(Duration::from_millis(500));
    }
}
