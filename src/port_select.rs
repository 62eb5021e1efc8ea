// src/port_select.rs
//
// Interactive serial port chooser shown when no port is given or saved.

use std::io::{BufRead, Write};

use crate::io::serial::SerialPortInfo;

/// `name (type: manufacturer product)`, omitting parts the OS did not report
pub fn describe(info: &SerialPortInfo) -> String {
    let details: Vec<&str> = [info.manufacturer.as_deref(), info.product.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if details.is_empty() {
        format!("{} ({})", info.port_name, info.port_type)
    } else {
        format!("{} ({}: {})", info.port_name, info.port_type, details.join(" "))
    }
}

/// Parse a 1-based menu choice. Returns the 0-based index.
pub fn parse_choice(input: &str, count: usize) -> Result<usize, &'static str> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| "Invalid input. Please enter a valid number.")?;
    if (1..=count).contains(&choice) {
        Ok(choice - 1)
    } else {
        Err("Invalid choice. Please select a valid port number.")
    }
}

pub fn print_ports<W: Write>(ports: &[SerialPortInfo], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Available serial ports:")?;
    for (i, info) in ports.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, describe(info))?;
    }
    Ok(())
}

/// Prompt until a valid port is chosen. Returns `None` if input ends first.
pub fn select_port<R: BufRead, W: Write>(
    ports: &[SerialPortInfo],
    mut input: R,
    mut out: W,
) -> std::io::Result<Option<String>> {
    print_ports(ports, &mut out)?;

    let mut line = String::new();
    loop {
        write!(out, "Select a port number (1, 2, etc.): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match parse_choice(&line, ports.len()) {
            Ok(idx) => return Ok(Some(ports[idx].port_name.clone())),
            Err(msg) => writeln!(out, "{}", msg)?,
        }
    }
}
